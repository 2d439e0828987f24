//! The `forums/topics` endpoint group.

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
            .field("forum", &[Rule::Required, Rule::Numeric])
            .field("author", &[Rule::Required, Rule::Numeric])
            .field("title", &[Rule::Required, Rule::Str])
            .field("post", &[Rule::Required, Rule::Str])
            .field("author_name", &[Rule::RequiredIf("author", "0"), Rule::Str])
            .field("prefix", &[Rule::Str])
            .field("tags", &[Rule::Str, Rule::Format("csv_alphanumeric")])
            .field("date", &[Rule::DateTime])
            .field("ip_address", &[Rule::Ip])
            .field("locked", &[Rule::In(&["0", "1"])])
            .field("open_time", &[Rule::DateTime])
            .field("close_time", &[Rule::DateTime])
            .field("hidden", &[Rule::In(&["-1", "0", "1"])])
            .field("pinned", &[Rule::In(&["0", "1"])])
            .field("featured", &[Rule::In(&["0", "1"])])
    });
    &SCHEMA
}

fn update_schema() -> &'static Schema {
    static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
        Schema::new()
            .field("forum", &[Rule::Numeric])
            .field("author", &[Rule::Numeric])
            .field("author_name", &[Rule::RequiredIf("author", "0"), Rule::Str])
            .field("title", &[Rule::Str])
            .field("post", &[Rule::Str])
            .field("prefix", &[Rule::Str])
            .field("tags", &[Rule::Str, Rule::Format("csv_alphanumeric")])
            .field("date", &[Rule::DateTime])
            .field("ip_address", &[Rule::Ip])
            .field("locked", &[Rule::In(&["0", "1"])])
            .field("open_time", &[Rule::DateTime])
            .field("close_time", &[Rule::DateTime])
            .field("hidden", &[Rule::In(&["-1", "0", "1"])])
            .field("pinned", &[Rule::In(&["0", "1"])])
            .field("featured", &[Rule::In(&["0", "1"])])
    });
    &SCHEMA
}

/// Operations on forum topics.
#[derive(Clone, Copy)]
pub struct Topics<'a> {
    client: &'a Client,
}

impl<'a> Topics<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetches one page of topics matching the search criteria.
    ///
    /// Takes the same criteria vocabulary as
    /// [`Posts::search_page`](crate::Posts::search_page).
    pub async fn search_page(
        &self,
        criteria: &Params,
        page: u64,
    ) -> Result<Response<Page<Value>>> {
        validate::search_listing().check(criteria, self.client.formats())?;
        let query = criteria.clone().set("page", page.to_string());
        self.client.get("forums/topics", query).await
    }

    /// Fetches every topic matching the search criteria, walking all pages
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

    /// Fetches a topic by ID.
    pub async fn by_id(&self, topic_id: u64) -> Result<Response<Value>> {
        self.client
            .get(&format!("forums/topics/{topic_id}"), Params::new())
            .await
    }

    /// Fetches the posts of a topic.
    pub async fn posts(&self, topic_id: u64) -> Result<Response<Value>> {
        self.client
            .get(&format!("forums/topics/{topic_id}/posts"), Params::new())
            .await
    }

    /// Creates a topic with its first post.
    ///
    /// With `author` 0 the topic is attributed to a guest and `extra` must
    /// carry an `author_name`. `extra` may also set `prefix`, `tags`,
    /// `date`, `ip_address`, `locked`, `open_time`, `close_time`, `hidden`,
    /// `pinned` and `featured`; it overrides the positional fields on key
    /// collision.
    pub async fn create(
        &self,
        forum: u64,
        author: u64,
        title: &str,
        post: &str,
        extra: Params,
    ) -> Result<Response<Value>> {
        let form = Params::new()
            .set("forum", forum.to_string())
            .set("author", author.to_string())
            .set("title", title)
            .set("post", post)
            .merge(extra);
        create_schema().check(&form, self.client.formats())?;
        self.client.post("forums/topics", form).await
    }

    /// Updates a topic.
    pub async fn update(&self, topic_id: u64, data: Params) -> Result<Response<Value>> {
        update_schema().check(&data, self.client.formats())?;
        self.client
            .post(&format!("forums/topics/{topic_id}"), data)
            .await
    }

    /// Deletes a topic by ID.
    pub async fn delete(&self, topic_id: u64) -> Result<Response<Value>> {
        self.client
            .delete(&format!("forums/topics/{topic_id}"))
            .await
    }
}
