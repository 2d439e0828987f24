//! Error types for IPBoard API calls.
//!
//! Every failure surfaces as exactly one [`Error`]. Remote failures are
//! translated from the vendor's error codes into a closed set of
//! [`ApiErrorKind`]s, so callers can match on the kind (catch
//! [`ApiErrorKind::Throttled`] and back off, catch
//! [`ApiErrorKind::MemberUsernameExists`] to report a duplicate) instead of
//! string-matching response bodies.

use http::StatusCode;

/// The closed set of domain failures the IPBoard API reports.
///
/// Each kind corresponds to one or more entries in the vendor's error-code
/// table. The mapping is static: a given code or HTTP status always
/// translates to the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// The API key was missing, revoked, or otherwise not accepted.
    InvalidApiKey,
    /// The API key has exceeded its allowed request rate.
    Throttled,
    /// No member exists with the given ID.
    MemberIdInvalid,
    /// The requested username is already taken.
    MemberUsernameExists,
    /// The requested email address is already registered.
    MemberEmailExists,
    /// The given primary group does not exist.
    MemberInvalidGroup,
    /// No topic exists with the given ID.
    ForumTopicIdInvalid,
    /// No forum exists with the given ID.
    ForumIdInvalid,
    /// No post exists with the given ID.
    ForumPostIdInvalid,
    /// The post body was rejected.
    PostInvalid,
    /// The topic title was rejected.
    TopicTitleInvalid,
    /// The first post of a topic cannot be hidden.
    CannotHideFirstPost,
    /// The first post of a topic cannot have its author changed.
    CannotAuthorFirstPost,
    /// The first post of a topic cannot be deleted on its own.
    CannotDeleteFirstPost,
    /// The server reported a failure it did not further identify.
    Unknown,
}

impl ApiErrorKind {
    /// Looks up the kind for a vendor error code (e.g. `"1C292/4"`).
    ///
    /// Codes are scoped by resource prefix: `1C292/*` covers members,
    /// `1F295/*` forum posts, `1F294/*` forum topics. Returns `None` for
    /// codes the table does not know.
    pub fn from_code(code: &str) -> Option<Self> {
        let kind = match code {
            // Authorization
            "3S290/7" => Self::InvalidApiKey,
            // Core/member
            "1C292/2" | "1C292/3" | "1C292/7" => Self::MemberIdInvalid,
            "1C292/4" => Self::MemberUsernameExists,
            "1C292/5" => Self::MemberEmailExists,
            "1C292/6" => Self::MemberInvalidGroup,
            // Forum posts
            "1F295/1" => Self::ForumTopicIdInvalid,
            "1F295/2" | "2F295/7" => Self::MemberIdInvalid,
            "1F295/3" => Self::PostInvalid,
            "1F295/4" | "1F295/5" | "2F295/6" => Self::ForumPostIdInvalid,
            "1F295/8" => Self::CannotHideFirstPost,
            "1F295/9" => Self::CannotAuthorFirstPost,
            "1F295/B" => Self::CannotDeleteFirstPost,
            // Forum topics
            "1F294/1" => Self::ForumTopicIdInvalid,
            "1F294/2" => Self::ForumIdInvalid,
            "1F294/3" => Self::MemberIdInvalid,
            "1F294/4" => Self::PostInvalid,
            "1F294/5" => Self::TopicTitleInvalid,
            _ => return None,
        };
        Some(kind)
    }

    /// Looks up the kind for a bare HTTP status, for error responses that
    /// carry no recognizable vendor code.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        match status.as_u16() {
            401 => Some(Self::InvalidApiKey),
            429 => Some(Self::Throttled),
            520 => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::InvalidApiKey => "the API key is not valid",
            Self::Throttled => "the API key has been throttled",
            Self::MemberIdInvalid => "the member ID is not valid",
            Self::MemberUsernameExists => "the username is already in use",
            Self::MemberEmailExists => "the email address is already in use",
            Self::MemberInvalidGroup => "the member group is not valid",
            Self::ForumTopicIdInvalid => "the topic ID is not valid",
            Self::ForumIdInvalid => "the forum ID is not valid",
            Self::ForumPostIdInvalid => "the post ID is not valid",
            Self::PostInvalid => "the post content is not valid",
            Self::TopicTitleInvalid => "the topic title is not valid",
            Self::CannotHideFirstPost => "the first post of a topic cannot be hidden",
            Self::CannotAuthorFirstPost => {
                "the author of the first post of a topic cannot be changed"
            }
            Self::CannotDeleteFirstPost => "the first post of a topic cannot be deleted",
            Self::Unknown => "the server reported an unidentified failure",
        };
        f.write_str(message)
    }
}

/// The main error type for IPBoard API calls.
///
/// Exactly one of these is produced per failing call; there is no
/// partial-success return. Raw response text is preserved where it exists so
/// failures remain debuggable in production.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A request parameter failed pre-flight validation.
    ///
    /// Carries the first violation message in schema-declaration order.
    /// Raised before any network I/O, so invalid input never costs a
    /// round-trip.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A network-level failure: connection refused, DNS lookup failure, or
    /// the per-request timeout elapsing.
    ///
    /// Always fatal to the call; the client never retries.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response could not be interpreted.
    ///
    /// Either a 2xx body failed to parse as the expected JSON, or an error
    /// response carried neither a known vendor code nor a known HTTP
    /// status.
    #[error("Malformed response from IPBoard (status {status}): {detail}")]
    MalformedResponse {
        /// The HTTP status code of the response.
        status: StatusCode,
        /// What went wrong while interpreting the body.
        detail: String,
        /// The raw response body.
        raw_response: String,
    },

    /// The server reported a recognized domain failure.
    #[error("IPBoard API error: {kind}")]
    Api {
        /// The translated failure category.
        kind: ApiErrorKind,
        /// The vendor error code, when the body carried one.
        code: Option<String>,
        /// The HTTP status code of the response.
        status: StatusCode,
    },

    /// Invalid client configuration (missing API key, bad base URL, ...).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns the translated [`ApiErrorKind`] if this error is a remote
    /// domain failure, `None` otherwise.
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Error::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::MalformedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error preserved one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::MalformedResponse { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

/// Translates a failing response into exactly one typed [`Error`].
///
/// Three-step fallback, deterministic and total:
/// 1. parse the body as JSON and read its `errorCode` field; a code known
///    to the vendor table wins regardless of HTTP status;
/// 2. otherwise, a status known to the table (401, 429, 520) decides;
/// 3. otherwise the response is reported as [`Error::MalformedResponse`].
///
/// Bodies that are not valid JSON or lack `errorCode` skip step 1.
pub(crate) fn translate(status: StatusCode, body: &str) -> Error {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let code = parsed
        .as_ref()
        .and_then(|v| v.get("errorCode"))
        .and_then(|c| c.as_str())
        .map(str::to_owned);

    if let Some(code) = &code {
        if let Some(kind) = ApiErrorKind::from_code(code) {
            return Error::Api {
                kind,
                code: Some(code.clone()),
                status,
            };
        }
    }

    if let Some(kind) = ApiErrorKind::from_status(status) {
        return Error::Api { kind, code, status };
    }

    Error::MalformedResponse {
        status,
        detail: "the error response could not be interpreted".to_string(),
        raw_response: body.to_string(),
    }
}

/// A specialized `Result` type for IPBoard API calls.
pub type Result<T> = std::result::Result<T, Error>;
