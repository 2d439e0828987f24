//! The `forums/posts` endpoint group.

use crate::{
    pages::{fetch_all_pages, Page},
    validate::{self, Rule, Schema},
    Client, Params, Response, Result,
};
use serde_json::Value;
use std::sync::LazyLock;

fn create_schema() -> &'static Schema {
    static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
        Schema::new()
            .field("topic", &[Rule::Required, Rule::Numeric])
            .field("author", &[Rule::Required, Rule::Numeric])
            .field("post", &[Rule::Required, Rule::Str])
            .field("author_name", &[Rule::RequiredIf("author", "0"), Rule::Str])
            .field("date", &[Rule::DateTime])
            .field("ip_address", &[Rule::Ip])
            .field("hidden", &[Rule::In(&["-1", "0", "1"])])
    });
    &SCHEMA
}

fn update_schema() -> &'static Schema {
    static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
        Schema::new()
            .field("author", &[Rule::Numeric])
            .field("author_name", &[Rule::RequiredIf("author", "0"), Rule::Str])
            .field("post", &[Rule::Str])
            .field("hidden", &[Rule::In(&["-1", "0", "1"])])
    });
    &SCHEMA
}

/// Operations on forum posts.
///
/// Search criteria and write payloads are validated against the operation's
/// schema before any network call; invalid input fails locally with
/// [`Error::Validation`](crate::Error::Validation).
#[derive(Clone, Copy)]
pub struct Posts<'a> {
    client: &'a Client,
}

impl<'a> Posts<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetches one page of posts matching the search criteria.
    ///
    /// Recognized criteria: `forums` and `authors` (comma-separated IDs),
    /// the `1`/`0` flags `hasBestAnswer`, `hasPoll`, `locked`, `hidden`,
    /// `pinned`, `featured`, `archived`, plus `sortBy` (`id`, `date`,
    /// `title`) and `sortDir` (`asc`, `desc`).
    pub async fn search_page(
        &self,
        criteria: &Params,
        page: u64,
    ) -> Result<Response<Page<Value>>> {
        validate::search_listing().check(criteria, self.client.formats())?;
        let query = criteria.clone().set("page", page.to_string());
        self.client.get("forums/posts", query).await
    }

    /// Fetches every post matching the search criteria, walking all pages
    /// sequentially.
    pub async fn search_all(&self, criteria: &Params) -> Result<Vec<Value>> {
        let this = *self;
        fetch_all_pages(move |page| async move {
            this.search_page(criteria, page)
                .await
                .map(|response| response.data)
        })
        .await
    }

    /// Fetches a post by ID.
    pub async fn by_id(&self, post_id: u64) -> Result<Response<Value>> {
        self.client
            .get(&format!("forums/posts/{post_id}"), Params::new())
            .await
    }

    /// Creates a post in a topic.
    ///
    /// With `author` 0 the post is attributed to a guest and `extra` must
    /// carry an `author_name`. `extra` may also set `date`, `ip_address`
    /// and `hidden`; it overrides the positional fields on key collision.
    pub async fn create(
        &self,
        topic: u64,
        author: u64,
        post: &str,
        extra: Params,
    ) -> Result<Response<Value>> {
        let form = Params::new()
            .set("topic", topic.to_string())
            .set("author", author.to_string())
            .set("post", post)
            .merge(extra);
        create_schema().check(&form, self.client.formats())?;
        self.client.post("forums/posts", form).await
    }

    /// Updates a post.
    pub async fn update(&self, post_id: u64, data: Params) -> Result<Response<Value>> {
        update_schema().check(&data, self.client.formats())?;
        self.client
            .post(&format!("forums/posts/{post_id}"), data)
            .await
    }

    /// Deletes a post by ID.
    pub async fn delete(&self, post_id: u64) -> Result<Response<Value>> {
        self.client.delete(&format!("forums/posts/{post_id}")).await
    }
}
