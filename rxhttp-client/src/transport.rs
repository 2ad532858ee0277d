//! Transport seam.
//!
//! A [`Transport`] issues one HTTP request per [`submit`](Transport::submit)
//! call and reports the result exactly once through the [`Completion`] it
//! was given. The returned [`TaskHandle`] cancels the in-flight task.
//!
//! [`HyperTransport`] is the default implementation, built on hyper_util's
//! legacy client with a rustls connector.
//!
//! # Example
//!
//! ```ignore
//! use rxhttp_client::transport::HyperTransport;
//! use std::time::Duration;
//!
//! let transport = HyperTransport::builder()
//!     .pool_idle_timeout(Duration::from_secs(60))
//!     .build()?;
//! ```

mod connector;
mod hyper;

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::oneshot;

use crate::error::TransportError;
use crate::log::RequestLogger;
use crate::request::Request;
use crate::response::{RawCompletion, RawResponse, ResponseMetadata};

pub use self::hyper::{HyperTransport, HyperTransportBuilder};
pub use connector::{build_https_connector, default_tls_config, has_tls_support};

// Re-export rustls types that users might need for TLS configuration
pub use rustls::ClientConfig as TlsClientConfig;

pub(crate) type Outcome = Result<RawResponse, TransportError>;

/// An HTTP transport.
///
/// Implementations must call [`Completion::complete`] at most once per
/// submitted task, from any thread. A cancelled task may still complete,
/// typically with [`TransportError::Cancelled`].
pub trait Transport: Send + Sync + 'static {
    fn submit(&self, request: Arc<Request>, completion: Completion) -> Box<dyn TaskHandle>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn submit(&self, request: Arc<Request>, completion: Completion) -> Box<dyn TaskHandle> {
        (**self).submit(request, completion)
    }
}

/// Handle to one in-flight transport task.
pub trait TaskHandle: Send {
    /// Ask the transport to abandon the task.
    fn cancel(&mut self);
}

/// Receiving end of a single transport task.
///
/// Consumed by [`complete`](Completion::complete), so a task can report at
/// most one result.
#[derive(Debug)]
pub struct Completion {
    logger: Option<RequestLogger>,
    tx: oneshot::Sender<Outcome>,
}

impl Completion {
    pub(crate) fn new(logger: Option<RequestLogger>) -> (Self, oneshot::Receiver<Outcome>) {
        let (tx, rx) = oneshot::channel();
        (Self { logger, tx }, rx)
    }

    /// Report the raw result of the task.
    ///
    /// Writes the request log lines when logging is enabled, then hands the
    /// outcome to the subscriber. A subscriber that was already disposed
    /// receives nothing.
    pub fn complete(self, raw: RawCompletion) {
        if let Some(logger) = &self.logger {
            logger.finish(&raw);
        }
        if self.tx.send(raw.into_outcome()).is_err() {
            tracing::trace!("completion delivered after the subscriber was disposed");
        }
    }

    /// Report a response.
    pub fn succeed(self, body: Option<Bytes>, response: ResponseMetadata) {
        self.complete(RawCompletion::success(body, response));
    }

    /// Report a failure.
    pub fn fail(self, error: TransportError) {
        self.complete(RawCompletion::failure(error));
    }

    /// Whether the subscriber is gone.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Hand-driven transport for unit tests.

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Debug, Default)]
    struct Shared {
        submitted: AtomicUsize,
        cancelled: AtomicUsize,
        pending: Mutex<Vec<(Arc<Request>, Completion)>>,
    }

    /// Stores completions until a test resolves them.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct MockTransport {
        shared: Arc<Shared>,
    }

    impl MockTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn submitted(&self) -> usize {
            self.shared.submitted.load(Ordering::SeqCst)
        }

        pub(crate) fn cancelled(&self) -> usize {
            self.shared.cancelled.load(Ordering::SeqCst)
        }

        /// Take the oldest pending completion.
        pub(crate) fn take(&self) -> (Arc<Request>, Completion) {
            let mut pending = self.shared.pending.lock().unwrap();
            assert!(!pending.is_empty(), "no pending task");
            pending.remove(0)
        }
    }

    struct MockHandle {
        shared: Arc<Shared>,
    }

    impl TaskHandle for MockHandle {
        fn cancel(&mut self) {
            self.shared.cancelled.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl Transport for MockTransport {
        fn submit(&self, request: Arc<Request>, completion: Completion) -> Box<dyn TaskHandle> {
            self.shared.submitted.fetch_add(1, Ordering::SeqCst);
            self.shared
                .pending
                .lock()
                .unwrap()
                .push((request, completion));
            Box::new(MockHandle {
                shared: self.shared.clone(),
            })
        }
    }
}
