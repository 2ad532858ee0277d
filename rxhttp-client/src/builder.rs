//! Client builder.
//!
//! Provides a fluent API for configuring and building an [`HttpClient`].

use crate::client::HttpClient;
use crate::config::ClientConfig;
use crate::log::LogSink;
use crate::transport::{HyperTransport, Transport};

/// Builder for creating an [`HttpClient`].
///
/// # Example
///
/// ```ignore
/// use rxhttp_client::{ClientBuilder, MemorySink};
///
/// let sink = MemorySink::new();
/// let client = ClientBuilder::new()
///     .log_requests(true)
///     .log_sink(sink.clone())
///     .build()?;
/// ```
pub struct ClientBuilder<T = DefaultTransport> {
    transport: T,
    config: ClientConfig,
}

impl<T> std::fmt::Debug for ClientBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("transport", &std::any::type_name::<T>())
            .field("config", &self.config)
            .finish()
    }
}

/// Transport slot of a builder that has not been given one.
///
/// [`ClientBuilder::build`] creates a [`HyperTransport`] in its place.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTransport;

/// Anything a [`ClientBuilder`] can turn into its transport.
pub trait IntoTransport {
    /// The transport the client will use.
    type Transport: Transport;

    /// Produce the transport.
    fn into_transport(self) -> Result<Self::Transport, ClientBuildError>;
}

impl IntoTransport for DefaultTransport {
    type Transport = HyperTransport;

    fn into_transport(self) -> Result<HyperTransport, ClientBuildError> {
        HyperTransport::new()
    }
}

impl<T: Transport> IntoTransport for T {
    type Transport = T;

    fn into_transport(self) -> Result<T, ClientBuildError> {
        Ok(self)
    }
}

impl ClientBuilder {
    /// Create a builder that uses a default [`HyperTransport`].
    pub fn new() -> Self {
        Self {
            transport: DefaultTransport,
            config: ClientConfig::default(),
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: IntoTransport> ClientBuilder<T> {
    /// Use `transport` instead of the default.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let transport = HyperTransport::builder()
    ///     .http2_only(true)
    ///     .build()?;
    ///
    /// let client = ClientBuilder::new()
    ///     .transport(transport)
    ///     .build()?;
    /// ```
    pub fn transport<U: Transport>(self, transport: U) -> ClientBuilder<U> {
        ClientBuilder {
            transport,
            config: self.config,
        }
    }

    /// Enable or disable request/response logging.
    pub fn log_requests(mut self, enabled: bool) -> Self {
        self.config = self.config.log_requests(enabled);
        self
    }

    /// Send request log lines to `sink`.
    pub fn log_sink<S: LogSink>(mut self, sink: S) -> Self {
        self.config = self.config.log_sink(sink);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the default transport cannot be created.
    pub fn build(self) -> Result<HttpClient<T::Transport>, ClientBuildError> {
        let transport = self.transport.into_transport()?;
        Ok(HttpClient::new(transport, self.config))
    }
}

/// Error building a client or transport.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientBuildError {
    /// TLS could not be configured.
    #[error("failed to configure TLS: {0}")]
    Tls(String),
}
