//! HTTP client for the IPBoard REST API.
//!
//! The [`Client`] type is the main entry point. Use [`ClientBuilder`] to
//! configure and create clients; endpoint groups hang off the client via
//! [`Client::members`], [`Client::forums`], [`Client::topics`] and
//! [`Client::posts`].

use crate::{
    error,
    forums::Forums,
    members::Members,
    posts::Posts,
    request::{Params, RequestSpec},
    topics::Topics,
    validate::FormatRegistry,
    Error, Response, Result,
};
use http::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// The reference configuration's per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// A client for the IPBoard REST API.
///
/// Authenticates every request with HTTP Basic auth, using the API key as
/// username and an empty password. The client is cheap to clone and safe to
/// share: its configuration is immutable after construction and it holds no
/// mutable state across calls. It performs no internal synchronization,
/// pooling beyond reqwest's connection pool, or request coalescing, and
/// never retries a failed call.
///
/// # Examples
///
/// ```no_run
/// use ipboard::{ApiErrorKind, Client, Error, Params};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder()
///     .base_url("https://forum.example.com/api/")?
///     .api_key("0123456789abcdef")
///     .timeout(Duration::from_secs(2))
///     .build()?;
///
/// let instance = client.hello().await?;
/// println!("talking to {:?}", instance.data);
///
/// let criteria = Params::new().set("forums", "1,2,3").set("sortBy", "date");
/// match client.posts().search_all(&criteria).await {
///     Ok(posts) => println!("{} posts", posts.len()),
///     Err(e) if e.api_kind() == Some(ApiErrorKind::Throttled) => {
///         eprintln!("rate limited, back off");
///     }
///     Err(e) => return Err(e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    reference: Option<String>,
    timeout: Duration,
    formats: FormatRegistry,
}

impl Client {
    /// Creates a new [`ClientBuilder`] for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The reference name this client was configured with, if any.
    pub fn reference(&self) -> Option<&str> {
        self.inner.reference.as_deref()
    }

    pub(crate) fn formats(&self) -> &FormatRegistry {
        &self.inner.formats
    }

    /// Executes one request: exactly one network round-trip, no retries.
    ///
    /// GET parameters travel in the query string, POST parameters as
    /// URL-encoded form fields, DELETE sends no body. On a 2xx response the
    /// body is decoded as JSON into `Res`; on any other status the body is
    /// handed to the error translator and the resulting typed error is
    /// returned. Transport failures (connection refused, DNS, timeout)
    /// surface as [`Error::Transport`].
    pub async fn execute<Res>(&self, spec: RequestSpec) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let started = Instant::now();

        let mut url = self.inner.base_url.join(&spec.path)?;
        for (key, value) in spec.query.iter() {
            url.query_pairs_mut().append_pair(key, value);
        }

        tracing::debug!(
            method = %spec.method,
            url = %url,
            "issuing request"
        );

        let mut request = self
            .inner
            .http
            .request(spec.method.clone(), url)
            .basic_auth(&self.inner.api_key, Some(""))
            .timeout(self.inner.timeout);

        if spec.method == Method::POST {
            request = request.form(spec.form.as_pairs());
        }

        let response = request.send().await?;
        self.parse_response(response, started.elapsed()).await
    }

    async fn parse_response<Res>(
        &self,
        response: reqwest::Response,
        latency: Duration,
    ) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let status = response.status();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            "received response"
        );

        if !status.is_success() {
            let raw = response.text().await?;
            if status.is_client_error() {
                tracing::error!(
                    status = status.as_u16(),
                    response = %raw,
                    "client error (4xx)"
                );
            } else {
                tracing::warn!(
                    status = status.as_u16(),
                    response = %raw,
                    "server error"
                );
            }
            return Err(error::translate(status, &raw));
        }

        let raw = response.text().await?;
        // Successful DELETEs come back with an empty body; decode it as
        // JSON null.
        let body = if raw.trim().is_empty() {
            "null"
        } else {
            raw.as_str()
        };

        match serde_json::from_str::<Res>(body) {
            Ok(data) => Ok(Response::new(data, raw, status, latency)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %raw,
                    "failed to decode response body"
                );
                Err(Error::MalformedResponse {
                    status,
                    detail: e.to_string(),
                    raw_response: raw,
                })
            }
        }
    }

    /// Issues a GET request with the given query parameters.
    pub async fn get<Res>(&self, path: &str, query: Params) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        self.execute(RequestSpec::new(Method::GET, path).with_query(query))
            .await
    }

    /// Issues a POST request with URL-encoded form fields.
    pub async fn post<Res>(&self, path: &str, form: Params) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        self.execute(RequestSpec::new(Method::POST, path).with_form(form))
            .await
    }

    /// Issues a DELETE request. No body is sent.
    pub async fn delete<Res>(&self, path: &str) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        self.execute(RequestSpec::new(Method::DELETE, path)).await
    }

    /// Calls `core/hello` for details of the forum instance.
    pub async fn hello(&self) -> Result<Response<Value>> {
        self.get("core/hello", Params::new()).await
    }

    /// The `core/members` endpoint group.
    pub fn members(&self) -> Members<'_> {
        Members::new(self)
    }

    /// The `forums/forums` endpoint group.
    pub fn forums(&self) -> Forums<'_> {
        Forums::new(self)
    }

    /// The `forums/topics` endpoint group.
    pub fn topics(&self) -> Topics<'_> {
        Topics::new(self)
    }

    /// The `forums/posts` endpoint group.
    pub fn posts(&self) -> Posts<'_> {
        Posts::new(self)
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// Configuration is injected explicitly here and frozen at
/// [`build`](ClientBuilder::build); the client never re-reads it
/// mid-lifetime.
///
/// # Examples
///
/// ```no_run
/// use ipboard::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), ipboard::Error> {
/// let client = ClientBuilder::new()
///     .base_url("https://forum.example.com/api/")?
///     .api_key("0123456789abcdef")
///     .reference("main-forum")
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    reference: Option<String>,
    timeout: Duration,
    formats: FormatRegistry,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with the default 2-second timeout.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            reference: None,
            timeout: DEFAULT_TIMEOUT,
            formats: FormatRegistry::default(),
        }
    }

    /// Sets the API base URL. Required.
    ///
    /// Endpoint paths like `core/members` are resolved relative to it, so
    /// the URL is normalized to end with a slash.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let mut url = Url::parse(url.as_ref())?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        self.base_url = Some(url);
        Ok(self)
    }

    /// Sets the API key. Required. Sent as the HTTP Basic username with an
    /// empty password on every request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the reference name identifying this API consumer.
    pub fn reference(mut self, name: impl Into<String>) -> Self {
        self.reference = Some(name.into());
        self
    }

    /// Sets the per-request timeout (default: 2 seconds).
    ///
    /// This is the only cancellation the client has; a call that exceeds it
    /// fails with [`Error::Transport`] and is not retried.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Registers a custom format validator usable from schemas via
    /// [`Rule::Format`](crate::Rule::Format).
    ///
    /// Schemas are otherwise static; this is the one extension point, meant
    /// to be exercised once at startup.
    pub fn format(mut self, name: &'static str, check: fn(&str) -> bool) -> Self {
        self.formats.register(name, check);
        self
    }

    /// Builds the configured [`Client`].
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or API key is missing, or the
    /// underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<Client> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Configuration("Base URL is required".to_string()))?;
        let api_key = self
            .api_key
            .ok_or_else(|| Error::Configuration("API key is required".to_string()))?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                api_key,
                reference: self.reference,
                timeout: self.timeout,
                formats: self.formats,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
