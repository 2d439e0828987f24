//! The `core/members` endpoint group.

use crate::{
    pages::{fetch_all_pages, Page},
    Client, Params, Response, Result,
};
use serde_json::Value;

/// Operations on forum members.
///
/// Obtained from [`Client::members`]; borrows the client and depends only
/// on its executor surface.
#[derive(Clone, Copy)]
pub struct Members<'a> {
    client: &'a Client,
}

impl<'a> Members<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetches one page of members.
    ///
    /// `sort_by` is one of `joined`, `name` or `ID`; `sort_dir` is `asc` or
    /// `desc`. The remote API validates these itself, so no schema applies
    /// here.
    pub async fn by_page(
        &self,
        sort_by: &str,
        sort_dir: &str,
        page: u64,
    ) -> Result<Response<Page<Value>>> {
        let query = Params::new()
            .set("sortBy", sort_by)
            .set("sortDir", sort_dir)
            .set("page", page.to_string());
        self.client.get("core/members", query).await
    }

    /// Fetches every member, walking all pages sequentially.
    pub async fn all(&self, sort_by: &str, sort_dir: &str) -> Result<Vec<Value>> {
        let this = *self;
        fetch_all_pages(move |page| async move {
            this.by_page(sort_by, sort_dir, page)
                .await
                .map(|response| response.data)
        })
        .await
    }

    /// Fetches a member by ID.
    pub async fn by_id(&self, member_id: u64) -> Result<Response<Value>> {
        self.client
            .get(&format!("core/members/{member_id}"), Params::new())
            .await
    }

    /// Creates a member. `group` defaults to the board's member group when
    /// `None`.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password: &str,
        group: Option<&str>,
    ) -> Result<Response<Value>> {
        let mut form = Params::new()
            .set("name", name)
            .set("email", email)
            .set("password", password);
        if let Some(group) = group {
            form = form.set("group", group);
        }
        self.client.post("core/members", form).await
    }

    /// Updates a member. Allowed keys are `name`, `email` and `password`.
    pub async fn update(&self, member_id: u64, data: Params) -> Result<Response<Value>> {
        self.client
            .post(&format!("core/members/{member_id}"), data)
            .await
    }

    /// Deletes a member by ID.
    pub async fn delete(&self, member_id: u64) -> Result<Response<Value>> {
        self.client
            .delete(&format!("core/members/{member_id}"))
            .await
    }
}
