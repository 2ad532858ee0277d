//! Hyper-based HTTP transport.
//!
//! This module provides [`HyperTransport`], the default transport, using
//! hyper_util's legacy client.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::{TokioExecutor, TokioTimer};
use rustls::ClientConfig;
use tokio::sync::oneshot;

use super::connector::build_https_connector;
use super::{Completion, TaskHandle, Transport};
use crate::builder::ClientBuildError;
use crate::error::TransportError;
use crate::request::Request;
use crate::response::{RawCompletion, ResponseMetadata};

/// Type alias for the hyper client with HTTPS connector.
type HyperClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// HTTP transport using hyper_util's legacy client.
///
/// Each submitted request runs on its own tokio task. Cancelling the task
/// handle stops the request and completes it with
/// [`TransportError::Cancelled`].
///
/// # Example
///
/// ```ignore
/// use rxhttp_client::{HttpClient, transport::HyperTransport};
///
/// let transport = HyperTransport::builder()
///     .http2_only(true)
///     .build()?;
///
/// let client = HttpClient::builder()
///     .transport(transport)
///     .build()?;
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    client: HyperClient,
    /// Whether HTTP/2 only mode is enabled.
    http2_only: bool,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("http2_only", &self.http2_only)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a new transport builder.
    pub fn builder() -> HyperTransportBuilder {
        HyperTransportBuilder::new()
    }

    /// Create a new transport with default settings.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::builder().build()
    }

    /// Check if this transport is configured for HTTP/2 only.
    pub fn is_http2_only(&self) -> bool {
        self.http2_only
    }

    /// Send the request and collect the whole response.
    async fn send(client: HyperClient, request: &Request) -> RawCompletion {
        let http_request = match to_http_request(request) {
            Ok(req) => req,
            Err(e) => return RawCompletion::failure(e),
        };

        let response = match client.request(http_request).await {
            Ok(response) => response,
            Err(e) => return RawCompletion::failure(TransportError::Connect(e.to_string())),
        };

        let metadata = ResponseMetadata::from(&response);
        match response.into_body().collect().await {
            Ok(collected) => RawCompletion::success(Some(collected.to_bytes()), metadata),
            Err(e) => RawCompletion {
                body: None,
                response: Some(metadata),
                error: Some(TransportError::Body(e.to_string())),
            },
        }
    }
}

impl Transport for HyperTransport {
    fn submit(&self, request: Arc<Request>, completion: Completion) -> Box<dyn TaskHandle> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            completion.fail(TransportError::Other(
                "HyperTransport requires a tokio runtime".to_string(),
            ));
            return Box::new(HyperTask { cancel: None });
        };

        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let client = self.client.clone();

        runtime.spawn(async move {
            let raw = tokio::select! {
                raw = Self::send(client, &request) => raw,
                Ok(()) = cancel_rx => {
                    tracing::debug!(url = %request.url(), "request cancelled in flight");
                    RawCompletion::failure(TransportError::Cancelled)
                }
            };
            completion.complete(raw);
        });

        Box::new(HyperTask {
            cancel: Some(cancel_tx),
        })
    }
}

/// Cancel handle for a request running on [`HyperTransport`].
struct HyperTask {
    cancel: Option<oneshot::Sender<()>>,
}

impl TaskHandle for HyperTask {
    fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            // task may already be finished
            let _ = tx.send(());
        }
    }
}

/// Convert a [`Request`] into the wire request hyper expects.
fn to_http_request(request: &Request) -> Result<http::Request<Full<Bytes>>, TransportError> {
    let mut builder = http::Request::builder()
        .method(request.method().clone())
        .uri(request.url());

    for (name, value) in request.headers() {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let body = request.body_bytes().cloned().unwrap_or_default();
    builder
        .body(Full::new(body))
        .map_err(|e| TransportError::InvalidRequest(e.to_string()))
}

/// Builder for [`HyperTransport`].
///
/// # Example
///
/// ```ignore
/// use rxhttp_client::transport::HyperTransportBuilder;
/// use std::time::Duration;
///
/// let transport = HyperTransportBuilder::new()
///     .http2_only(true)
///     .pool_idle_timeout(Duration::from_secs(90))
///     .build()?;
/// ```
pub struct HyperTransportBuilder {
    /// Custom TLS configuration.
    tls_config: Option<ClientConfig>,
    /// Force HTTP/2 only (for h2c or when HTTP/2 is required).
    http2_only: bool,
    /// Connection pool idle timeout.
    pool_idle_timeout: Option<Duration>,
    /// Maximum idle connections per host.
    pool_max_idle_per_host: usize,
}

impl Default for HyperTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HyperTransportBuilder {
    /// Create a new transport builder with default settings.
    pub fn new() -> Self {
        Self {
            tls_config: None,
            http2_only: false,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 32,
        }
    }

    /// Set a custom TLS configuration.
    ///
    /// Use this to configure custom root certificates, client certificates for mTLS,
    /// or other TLS settings.
    pub fn tls_config(mut self, config: ClientConfig) -> Self {
        self.tls_config = Some(config);
        self
    }

    /// Enable HTTP/2 only mode.
    pub fn http2_only(mut self, enabled: bool) -> Self {
        self.http2_only = enabled;
        self
    }

    /// Set the idle timeout of hyper's connection pool.
    ///
    /// Default: 90 seconds.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Set the maximum number of idle connections per host.
    ///
    /// Default: 32.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<HyperTransport, ClientBuildError> {
        let https_connector = build_https_connector(self.tls_config)?;

        let mut builder = Client::builder(TokioExecutor::new());

        // Configure connection pool timer (required for pool_idle_timeout to work)
        builder.pool_timer(TokioTimer::new());

        if let Some(timeout) = self.pool_idle_timeout {
            builder.pool_idle_timeout(timeout);
        }
        builder.pool_max_idle_per_host(self.pool_max_idle_per_host);

        if self.http2_only {
            builder.http2_only(true);
        }

        let client = builder.build(https_connector);

        Ok(HyperTransport {
            client,
            http2_only: self.http2_only,
        })
    }
}

impl std::fmt::Debug for HyperTransportBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransportBuilder")
            .field("tls_config", &self.tls_config.is_some())
            .field("http2_only", &self.http2_only)
            .field("pool_idle_timeout", &self.pool_idle_timeout)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .finish()
    }
}
