//! Response wrapper that preserves both parsed data and raw response details.
//!
//! The [`Response`] type wraps the decoded payload along with the HTTP
//! status, call latency, and the raw response body for debugging and
//! observability.

use http::StatusCode;
use std::time::Duration;

/// A successful HTTP response.
///
/// Most IPBoard payloads are open-schema, so `T` is typically
/// [`serde_json::Value`]; paged listings decode into
/// [`Page`](crate::pages::Page).
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), ipboard::Error> {
/// let client = ipboard::Client::builder()
///     .base_url("https://forum.example.com/api/")?
///     .api_key("0123456789abcdef")
///     .build()?;
///
/// let response = client.hello().await?;
/// println!("instance: {:?}", response.data);
/// println!("took {:?}", response.latency);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded response payload.
    pub data: T,

    /// The raw response body as a string, for inspecting exactly what the
    /// server sent.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// How long the round-trip took.
    pub latency: Duration,
}

impl<T> Response<T> {
    pub(crate) fn new(data: T, raw_body: String, status: StatusCode, latency: Duration) -> Self {
        Self {
            data,
            raw_body,
            status,
            latency,
        }
    }

    /// Maps the payload to a different type while preserving the metadata.
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            raw_body: self.raw_body,
            status: self.status,
            latency: self.latency,
        }
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
