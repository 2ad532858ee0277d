//! Request/response logging.
//!
//! When request logging is enabled the executor writes two lines per
//! completed request through a [`LogSink`]: a curl command that reproduces
//! the request, and a one-line summary of the outcome.
//!
//! ```text
//! curl -i -v -X POST -d "d" -H "A: b" "http://x"
//! Success (12ms): Status 200
//! ```
//!
//! The formatters are pure functions so the output can be checked
//! byte-for-byte.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::error::TransportError;
use crate::request::Request;
use crate::response::{RawCompletion, ResponseMetadata};

/// Target used for request log events emitted by [`TracingSink`].
pub const LOG_TARGET: &str = "rxhttp_client::request";

/// Backslash-escape every double quote.
pub fn escape_terminal(value: &str) -> String {
    value.replace('"', "\\\"")
}

/// Render a request as an equivalent curl command line.
pub fn curl_command(request: &Request) -> String {
    let mut out = format!("curl -i -v -X {} ", request.method());

    if request.method_carries_body() {
        if let Some(body) = request.body_bytes().and_then(|b| std::str::from_utf8(b).ok()) {
            out.push_str(&format!("-d \"{}\" ", escape_terminal(body)));
        }
    }

    for (name, value) in request.headers() {
        out.push_str(&format!(
            "-H \"{}: {}\" ",
            escape_terminal(name),
            escape_terminal(value)
        ));
    }

    out.push_str(&format!("\"{}\"", escape_terminal(request.url())));
    out
}

/// Render the outcome of a completed request.
///
/// A response, when present, decides the line even if an error was also
/// reported.
pub fn outcome_line(
    _body: Option<&Bytes>,
    response: Option<&ResponseMetadata>,
    error: Option<&TransportError>,
    elapsed: Duration,
) -> String {
    let ms = elapsed.as_millis();

    if let Some(response) = response {
        let code = response.status().as_u16();
        return if response.is_success() {
            format!("Success ({ms}ms): Status {code}")
        } else {
            format!("Failure ({ms}ms): Status {code}")
        };
    }

    match error {
        Some(e) if e.is_cancelled() => format!("Cancelled ({ms}ms)"),
        Some(e) => format!("Failure ({ms}ms): {e}"),
        None => "<unhandled>".to_string(),
    }
}

/// Destination for request log lines.
pub trait LogSink: Send + Sync + 'static {
    fn line(&self, line: &str);
}

/// Emits each line as a `tracing` event at `INFO` on [`LOG_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn line(&self, line: &str) {
        tracing::info!(target: LOG_TARGET, "{}", line);
    }
}

/// Keeps lines in memory.
///
/// Useful for golden-output checks.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

/// Per-execution logger.
///
/// Only built when request logging is enabled, so a disabled configuration
/// never takes a timestamp.
pub(crate) struct RequestLogger {
    sink: Arc<dyn LogSink>,
    request: Arc<Request>,
    started: Instant,
}

impl RequestLogger {
    pub(crate) fn start(sink: Arc<dyn LogSink>, request: Arc<Request>) -> Self {
        Self {
            sink,
            request,
            started: Instant::now(),
        }
    }

    pub(crate) fn finish(&self, raw: &RawCompletion) {
        let elapsed = self.started.elapsed();
        self.sink.line(&curl_command(&self.request));
        self.sink.line(&outcome_line(
            raw.body.as_ref(),
            raw.response.as_ref(),
            raw.error.as_ref(),
            elapsed,
        ));
    }
}

impl fmt::Debug for RequestLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestLogger")
            .field("url", &self.request.url())
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}
