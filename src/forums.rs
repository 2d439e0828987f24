//! The `forums/forums` endpoint group.

use crate::{Client, Params, Response, Result};
use serde_json::Value;

/// Operations on forums themselves. The forum listing is not paged.
#[derive(Clone, Copy)]
pub struct Forums<'a> {
    client: &'a Client,
}

impl<'a> Forums<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetches all forums.
    pub async fn all(&self) -> Result<Response<Value>> {
        self.client.get("forums/forums", Params::new()).await
    }

    /// Fetches a forum by ID.
    pub async fn by_id(&self, forum_id: u64) -> Result<Response<Value>> {
        self.client
            .get(&format!("forums/forums/{forum_id}"), Params::new())
            .await
    }
}
