//! Request value handed to the executor.
//!
//! A [`Request`] is built by the caller before any stage runs and is never
//! mutated afterwards. Header names keep the caller's spelling; case
//! handling is left to the transport.

use bytes::Bytes;
use http::Method;

/// An HTTP request description.
///
/// # Example
///
/// ```
/// use rxhttp_client::Request;
///
/// let request = Request::post("http://localhost:3000/items")
///     .header("Content-Type", "application/json")
///     .body(r#"{"name":"widget"}"#);
///
/// assert_eq!(request.method(), "POST");
/// assert_eq!(request.headers().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<Bytes>,
}

impl Request {
    /// Create a request with no headers and no body.
    pub fn new<S: Into<String>>(method: Method, url: S) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Create a `GET` request.
    pub fn get<S: Into<String>>(url: S) -> Self {
        Self::new(Method::GET, url)
    }

    /// Create a `POST` request.
    pub fn post<S: Into<String>>(url: S) -> Self {
        Self::new(Method::POST, url)
    }

    /// Append a header. Repeated names are kept in insertion order.
    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the request body.
    pub fn body<B: Into<Bytes>>(mut self, body: B) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body_bytes(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Whether this method conventionally carries a request body.
    pub fn method_carries_body(&self) -> bool {
        matches!(self.method, Method::POST | Method::PUT | Method::PATCH)
    }
}
