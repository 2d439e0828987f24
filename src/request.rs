//! Per-call request description types.
//!
//! A [`RequestSpec`] is constructed for each call and discarded once the
//! call returns or fails; nothing in it is retained by the client.

use http::Method;

/// An ordered collection of string parameters.
///
/// Used both for query strings (GET) and URL-encoded form fields (POST).
/// Insertion order is preserved; [`Params::set`] replaces an existing value
/// for the same key rather than appending a duplicate.
///
/// # Examples
///
/// ```
/// use ipboard::Params;
///
/// let criteria = Params::new()
///     .set("forums", "1,2,3")
///     .set("sortBy", "date")
///     .set("sortDir", "desc");
///
/// assert_eq!(criteria.get("sortBy"), Some("date"));
/// assert_eq!(criteria.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any existing value for the same key.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Merges `other` into `self`; keys present in both take the value from
    /// `other`.
    pub fn merge(mut self, other: Params) -> Self {
        for (key, value) in other.pairs {
            self = self.set(key, value);
        }
        self
    }

    /// Returns the value for `key`, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the number of parameters set.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Iterates over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The parameters as key/value pairs, suitable for form encoding.
    pub(crate) fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Params::new(), |params, (k, v)| params.set(k, v))
    }
}

/// Everything needed to issue one HTTP call: method, path relative to the
/// base URL, query parameters, and form fields.
///
/// GET calls carry their parameters in `query`; POST calls carry theirs in
/// `form` (sent `application/x-www-form-urlencoded`); DELETE calls carry
/// neither.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// The HTTP method. The executor accepts any method, though the
    /// endpoint surface only issues GET, POST and DELETE.
    pub method: Method,

    /// The request path, relative to the client's base URL.
    pub path: String,

    /// Query-string parameters.
    pub query: Params,

    /// URL-encoded form fields for the request body.
    pub form: Params,
}

impl RequestSpec {
    /// Creates a new `RequestSpec` with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Params::new(),
            form: Params::new(),
        }
    }

    /// Sets the query parameters.
    pub fn with_query(mut self, query: Params) -> Self {
        self.query = query;
        self
    }

    /// Sets the form fields.
    pub fn with_form(mut self, form: Params) -> Self {
        self.form = form;
        self
    }
}
