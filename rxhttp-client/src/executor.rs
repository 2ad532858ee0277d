//! Single-request execution as a stream.
//!
//! [`Execute`] wraps one transport call. It is lazy: the request is only
//! submitted on the first poll. It yields at most one item, the raw
//! response or the transport error, and then ends.
//!
//! # Cancellation
//!
//! Dropping an [`Execute`] (or calling [`Execute::cancel`]) before it has
//! yielded cancels the transport task exactly once. The stream then ends
//! without an error. If the transport still reports the cancelled task,
//! the outcome is logged (when logging is on) and discarded.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};

use futures::Stream;
use futures::stream::FusedStream;
use tokio::sync::oneshot;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::request::Request;
use crate::response::RawResponse;
use crate::transport::{Completion, Outcome, TaskHandle, Transport};

enum State {
    /// Not yet polled.
    Idle,
    /// Submitted; waiting for the completion.
    Running {
        rx: oneshot::Receiver<Outcome>,
        handle: Box<dyn TaskHandle>,
    },
    /// Yielded, cancelled, or dropped.
    Done,
}

/// Stream of the raw outcome of one request.
///
/// Created by [`HttpClient::execute`](crate::HttpClient::execute).
///
/// # Example
///
/// ```ignore
/// use futures::StreamExt;
///
/// let mut stream = client.execute(Request::get("http://localhost:3000/ok"));
/// if let Some(result) = stream.next().await {
///     let raw = result?;
///     println!("status: {:?}", raw.metadata().map(|m| m.status()));
/// }
/// ```
#[must_use = "streams do nothing unless polled"]
pub struct Execute {
    transport: Arc<dyn Transport>,
    request: Arc<Request>,
    config: ClientConfig,
    state: State,
}

impl Execute {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        request: Arc<Request>,
        config: ClientConfig,
    ) -> Self {
        Self {
            transport,
            request,
            config,
            state: State::Idle,
        }
    }

    /// The request this stream executes.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Whether the request has been handed to the transport and has not
    /// finished yet.
    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    /// Stop the stream, cancelling the transport task if it is in flight.
    ///
    /// Calling this more than once has no further effect.
    pub fn cancel(&mut self) {
        if let State::Running { mut handle, .. } = std::mem::replace(&mut self.state, State::Done)
        {
            handle.cancel();
        }
    }

    fn start(&mut self) {
        let logger = self.config.request_logger(&self.request);
        let (completion, rx) = Completion::new(logger);
        let handle = self.transport.submit(self.request.clone(), completion);
        self.state = State::Running { rx, handle };
    }
}

impl Stream for Execute {
    type Item = Result<RawResponse, Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if matches!(this.state, State::Idle) {
            this.start();
        }

        let State::Running { rx, .. } = &mut this.state else {
            return Poll::Ready(None);
        };

        let outcome = ready!(Pin::new(rx).poll(cx));
        // finished: the handle is released without cancelling
        this.state = State::Done;

        let item = match outcome {
            Ok(Ok(raw)) => Ok(raw),
            Ok(Err(e)) => Err(Error::Transport(e)),
            Err(_) => {
                tracing::error!(
                    url = %this.request.url(),
                    "transport dropped the completion without reporting"
                );
                Err(Error::InternalContract(
                    "transport dropped the completion without reporting",
                ))
            }
        };
        Poll::Ready(Some(item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            State::Done => (0, Some(0)),
            _ => (0, Some(1)),
        }
    }
}

impl FusedStream for Execute {
    fn is_terminated(&self) -> bool {
        matches!(self.state, State::Done)
    }
}

impl Drop for Execute {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Execute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            State::Idle => "idle",
            State::Running { .. } => "running",
            State::Done => "done",
        };
        f.debug_struct("Execute")
            .field("method", self.request.method())
            .field("url", &self.request.url())
            .field("state", &state)
            .finish_non_exhaustive()
    }
}
