//! Single-shot HTTP requests as cancellable streams.
//!
//! This crate turns one HTTP request into a lazy [`futures::Stream`] that
//! yields at most one item and then ends. Dropping the stream cancels the
//! request.
//!
//! Three pipelines are built on top of each other:
//!
//! | Method | Stages | Item |
//! |--------|--------|------|
//! | [`HttpClient::execute`] | executor | [`RawResponse`] |
//! | [`HttpClient::fetch_body`] | executor, status gate | [`Bytes`] |
//! | [`HttpClient::fetch_json`] | executor, status gate, JSON decoder | `T: DeserializeOwned` |
//!
//! The status gate treats `[200, 300)` as success and fails every other
//! status with [`Error::Network`], which carries the response metadata.
//!
//! ## Example
//!
//! ```ignore
//! use futures::StreamExt;
//! use rxhttp_client::{HttpClient, Request};
//!
//! let client = HttpClient::builder().build()?;
//!
//! let request = Request::post("http://localhost:3000/items")
//!     .header("Content-Type", "application/json")
//!     .body(r#"{"name":"widget"}"#);
//!
//! let mut stream = client.fetch_json::<serde_json::Value>(request);
//! while let Some(result) = stream.next().await {
//!     match result {
//!         Ok(item) => println!("created: {item}"),
//!         Err(e) => eprintln!("error: {e}"),
//!     }
//! }
//! ```
//!
//! ## Cancellation
//!
//! Streams are cancelled by dropping them, or explicitly with
//! [`Execute::cancel`]. Cancellation is not an error: the stream simply
//! ends. Races against a shutdown signal work with `tokio::select!`:
//!
//! ```ignore
//! let mut stream = client.fetch_body(Request::get("http://localhost:3000/slow"));
//!
//! tokio::select! {
//!     _ = shutdown_rx => {
//!         // stream is dropped here, the request is cancelled
//!     }
//!     item = stream.next() => handle(item),
//! }
//! ```
//!
//! There is no retry and no timeout in the pipeline; wrap the stream with
//! `tokio::time::timeout` if a deadline is needed.
//!
//! ## Request Logging
//!
//! With [`ClientBuilder::log_requests`] enabled, every completed request
//! writes two lines to the configured [`LogSink`] (by default a `tracing`
//! event on target `rxhttp_client::request`):
//!
//! ```text
//! curl -i -v -X POST -d "d" -H "A: b" "http://x"
//! Success (12ms): Status 200
//! ```
//!
//! The second line is one of `Success (<ms>ms): Status <code>`,
//! `Failure (<ms>ms): Status <code>`, `Cancelled (<ms>ms)`,
//! `Failure (<ms>ms): <error>`. Requests cancelled by dropping the stream
//! are still logged when the transport reports the cancellation.
//!
//! ## Custom Transports
//!
//! Implement [`Transport`] to run the pipeline over something other than
//! hyper. A transport reports each task exactly once through its
//! [`Completion`] and returns a [`TaskHandle`] used for cancellation.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tls` (default) | `tls-ring` + `tls-native-roots` |
//! | `tls-ring` / `tls-aws-lc` | rustls crypto provider |
//! | `tls-native-roots` / `tls-webpki-roots` | root certificates |
//! | `cli` | the `fetch` demo binary |

mod builder;
mod client;
pub mod config;
mod decoder;
mod error;
mod executor;
mod gate;
pub mod log;
pub mod request;
pub mod response;
pub mod transport;

pub use builder::{ClientBuildError, ClientBuilder, DefaultTransport, IntoTransport};
pub use client::HttpClient;
pub use config::ClientConfig;
pub use decoder::{FetchJson, decode_json};
pub use error::{Error, TransportError};
pub use executor::Execute;
pub use gate::{FetchBody, check_status};
pub use log::{LogSink, MemorySink, TracingSink, curl_command, outcome_line};
pub use request::Request;
pub use response::{RawCompletion, RawResponse, ResponseMetadata};

// Re-export transport types at the top level for convenience
pub use transport::{Completion, HyperTransport, HyperTransportBuilder, TaskHandle, Transport};

pub use bytes::Bytes;
