//! Error types for the request pipeline.
//!
//! [`TransportError`] is what a transport reports. [`Error`] is what a
//! pipeline stream yields as its terminal item.

use http::StatusCode;

use crate::response::ResponseMetadata;

/// Failure reported by the underlying transport.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The task was cancelled before it completed.
    #[error("request cancelled")]
    Cancelled,

    /// The request could not be turned into a wire request (bad URL, header, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Connection-level failure (refused, reset, TLS, ...).
    #[error("connection failed: {0}")]
    Connect(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other transport-specific failure.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Whether this error belongs to the cancellation class.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransportError::Cancelled)
    }
}

/// Terminal error of a pipeline stream.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transport failed; forwarded verbatim.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a status outside `[200, 300)`.
    #[error("server returned failure: status {status}")]
    Network {
        status: StatusCode,
        metadata: ResponseMetadata,
    },

    /// A collaborator broke its contract (e.g. success without response metadata).
    ///
    /// This is a programming error, not a network condition.
    #[error("internal contract violation: {0}")]
    InternalContract(&'static str),

    /// The body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),
}

impl Error {
    /// The HTTP status for [`Error::Network`].
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Network { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The response metadata for [`Error::Network`].
    pub fn metadata(&self) -> Option<&ResponseMetadata> {
        match self {
            Error::Network { metadata, .. } => Some(metadata),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Transport(e) if e.is_cancelled())
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Error::InternalContract(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err)
    }
}
