//! Response types produced by a transport.
//!
//! A transport reports its outcome as a [`RawCompletion`]: body, response
//! metadata and error, each independently optional. The executor collapses
//! that shape into `Result<RawResponse, TransportError>` as soon as it
//! arrives, so later stages only ever see one well-formed value.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::error::TransportError;

/// Status code and headers of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMetadata {
    status: StatusCode,
    headers: HeaderMap,
}

impl ResponseMetadata {
    /// Create metadata from a status code and headers.
    pub fn new(status: StatusCode, headers: HeaderMap) -> Self {
        Self { status, headers }
    }

    /// Create metadata with the given status and no headers.
    pub fn from_status(status: StatusCode) -> Self {
        Self::new(status, HeaderMap::new())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the status code lies in `[200, 300)`.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get a header value by name.
    ///
    /// Returns `None` if the header is not present or cannot be converted to a string.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).and_then(|v| v.to_str().ok())
    }

    /// Get the underlying HeaderMap.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Consume self and return the underlying HeaderMap.
    pub fn into_headers(self) -> HeaderMap {
        self.headers
    }
}

impl<B> From<&http::Response<B>> for ResponseMetadata {
    fn from(response: &http::Response<B>) -> Self {
        Self::new(response.status(), response.headers().clone())
    }
}

/// Successful transport completion: the body and the response metadata.
///
/// Both halves stay optional here. A transport that reports success without
/// metadata has broken its contract; the status gate turns that into
/// [`Error::InternalContract`](crate::Error::InternalContract) instead of
/// guessing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    body: Option<Bytes>,
    metadata: Option<ResponseMetadata>,
}

impl RawResponse {
    pub fn new(body: Option<Bytes>, metadata: Option<ResponseMetadata>) -> Self {
        Self { body, metadata }
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn metadata(&self) -> Option<&ResponseMetadata> {
        self.metadata.as_ref()
    }

    /// Decompose into body and metadata.
    pub fn into_parts(self) -> (Option<Bytes>, Option<ResponseMetadata>) {
        (self.body, self.metadata)
    }
}

/// The untyped completion triple a transport hands back.
#[derive(Debug, Default)]
pub struct RawCompletion {
    pub body: Option<Bytes>,
    pub response: Option<ResponseMetadata>,
    pub error: Option<TransportError>,
}

impl RawCompletion {
    /// A completion carrying a response.
    pub fn success(body: Option<Bytes>, response: ResponseMetadata) -> Self {
        Self {
            body,
            response: Some(response),
            error: None,
        }
    }

    /// A completion carrying only an error.
    pub fn failure(error: TransportError) -> Self {
        Self {
            body: None,
            response: None,
            error: Some(error),
        }
    }

    /// Collapse the triple into a tagged outcome.
    ///
    /// An error is authoritative: body or metadata delivered alongside it
    /// are discarded.
    pub fn into_outcome(self) -> Result<RawResponse, TransportError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(RawResponse::new(self.body, self.response)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::HeaderValue;

    #[test]
    fn test_metadata_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-custom", HeaderValue::from_static("value"));
        let metadata = ResponseMetadata::new(StatusCode::OK, headers);

        assert_eq!(metadata.header("x-custom"), Some("value"));
        assert_eq!(metadata.header("missing"), None);
        assert!(metadata.is_success());
    }

    #[test]
    fn test_metadata_from_http_response() {
        let response = http::Response::builder()
            .status(404)
            .header("content-type", "text/plain")
            .body(())
            .unwrap();
        let metadata = ResponseMetadata::from(&response);

        assert_eq!(metadata.status(), StatusCode::NOT_FOUND);
        assert_eq!(metadata.header("content-type"), Some("text/plain"));
        assert!(!metadata.is_success());
    }

    #[test]
    fn test_error_is_authoritative() {
        let raw = RawCompletion {
            body: Some(Bytes::from_static(b"partial")),
            response: Some(ResponseMetadata::from_status(StatusCode::OK)),
            error: Some(TransportError::Connect("reset".into())),
        };

        let err = raw.into_outcome().unwrap_err();
        assert!(matches!(err, TransportError::Connect(_)));
    }

    #[test]
    fn test_success_keeps_body_and_metadata() {
        let raw = RawCompletion::success(
            Some(Bytes::from_static(b"hi")),
            ResponseMetadata::from_status(StatusCode::OK),
        );

        let (body, metadata) = raw.into_outcome().unwrap().into_parts();
        assert_eq!(body, Some(Bytes::from_static(b"hi")));
        assert_eq!(metadata.map(|m| m.status()), Some(StatusCode::OK));
    }

    #[test]
    fn test_missing_everything_is_still_success_shaped() {
        let outcome = RawCompletion::default().into_outcome().unwrap();
        assert!(outcome.body().is_none());
        assert!(outcome.metadata().is_none());
    }
}
