//! Client configuration.
//!
//! [`ClientConfig`] is an immutable value cloned into every execution. It
//! carries the request-logging switch and the sink log lines go to.

use std::fmt;
use std::sync::Arc;

use crate::log::{LogSink, RequestLogger, TracingSink};
use crate::request::Request;

/// Configuration shared by every request made through a client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Whether request/response log lines are written.
    log_requests: bool,
    /// Where log lines go.
    sink: Arc<dyn LogSink>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable request logging.
    pub fn log_requests(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    /// Send log lines to `sink` instead of `tracing`.
    pub fn log_sink<S: LogSink>(mut self, sink: S) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn logs_requests(&self) -> bool {
        self.log_requests
    }

    /// Start a logger for one execution, or `None` when logging is off.
    pub(crate) fn request_logger(&self, request: &Arc<Request>) -> Option<RequestLogger> {
        self.log_requests
            .then(|| RequestLogger::start(self.sink.clone(), request.clone()))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_requests: false,
            sink: Arc::new(TracingSink),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("log_requests", &self.log_requests)
            .finish_non_exhaustive()
    }
}
