//! HTTP client facade.
//!
//! This module provides [`HttpClient`], the entry point for the three
//! request pipelines.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::builder::ClientBuilder;
use crate::config::ClientConfig;
use crate::decoder::FetchJson;
use crate::executor::Execute;
use crate::gate::FetchBody;
use crate::request::Request;
use crate::transport::{HyperTransport, Transport};

/// HTTP client producing single-shot request streams.
///
/// Every call returns a fresh, lazy stream: nothing is sent until the
/// stream is polled, and each stream issues its own request. Cloning the
/// client is cheap.
///
/// | Method | Item |
/// |--------|------|
/// | [`execute`](Self::execute) | [`RawResponse`](crate::RawResponse) |
/// | [`fetch_body`](Self::fetch_body) | [`Bytes`](bytes::Bytes) of a 2xx response |
/// | [`fetch_json`](Self::fetch_json) | decoded JSON of a 2xx response |
///
/// # Example
///
/// ```ignore
/// use futures::StreamExt;
/// use rxhttp_client::{HttpClient, Request};
///
/// let client = HttpClient::builder().log_requests(true).build()?;
///
/// let mut stream = client.fetch_json_url("http://localhost:3000/items");
/// match stream.next().await {
///     Some(Ok(value)) => println!("{value}"),
///     Some(Err(e)) => eprintln!("request failed: {e}"),
///     None => {}
/// }
/// ```
#[derive(Debug)]
pub struct HttpClient<T = HyperTransport> {
    transport: Arc<T>,
    config: ClientConfig,
}

impl<T> Clone for HttpClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            config: self.config.clone(),
        }
    }
}

impl HttpClient<HyperTransport> {
    /// Create a new [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

impl<T: Transport> HttpClient<T> {
    /// Create a client over `transport`.
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Stream the raw response (body and metadata) of `request`.
    ///
    /// Any status code is a success here; only transport failures are
    /// errors.
    pub fn execute(&self, request: Request) -> Execute {
        let transport: Arc<dyn Transport> = self.transport.clone();
        Execute::new(transport, Arc::new(request), self.config.clone())
    }

    /// Stream the body of `request`, failing on a non-2xx status.
    pub fn fetch_body(&self, request: Request) -> FetchBody<Execute> {
        FetchBody::new(self.execute(request))
    }

    /// Stream the body of `request` decoded as JSON.
    ///
    /// Decodes into any `D: DeserializeOwned`, so callers name the target
    /// type. Use [`fetch_json_url`](Self::fetch_json_url) for a plain
    /// [`serde_json::Value`].
    pub fn fetch_json<D: DeserializeOwned>(
        &self,
        request: Request,
    ) -> FetchJson<FetchBody<Execute>, D> {
        FetchJson::new(self.fetch_body(request))
    }

    /// `GET url` with no headers and no body, decoded as a JSON value.
    pub fn fetch_json_url<S: Into<String>>(
        &self,
        url: S,
    ) -> FetchJson<FetchBody<Execute>, serde_json::Value> {
        self.fetch_json(Request::get(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, TransportError};
    use crate::log::MemorySink;
    use crate::response::ResponseMetadata;
    use crate::transport::mock::MockTransport;
    use bytes::Bytes;
    use futures::StreamExt;
    use http::StatusCode;
    use serde_json::json;

    fn client(transport: &MockTransport) -> HttpClient<MockTransport> {
        HttpClient::new(transport.clone(), ClientConfig::default())
    }

    #[tokio::test]
    async fn test_fetch_body_ok() {
        let transport = MockTransport::new();
        let mut stream = client(&transport).fetch_body(Request::get("http://x/ok"));
        assert!(futures::poll!(stream.next()).is_pending());

        let (_, completion) = transport.take();
        completion.succeed(
            Some(Bytes::from_static(b"hi")),
            ResponseMetadata::from_status(StatusCode::OK),
        );

        assert_eq!(stream.next().await.unwrap().unwrap(), Bytes::from_static(b"hi"));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_body_missing() {
        let transport = MockTransport::new();
        let mut stream = client(&transport).fetch_body(Request::get("http://x/missing"));
        assert!(futures::poll!(stream.next()).is_pending());

        let (_, completion) = transport.take();
        completion.succeed(
            Some(Bytes::new()),
            ResponseMetadata::from_status(StatusCode::NOT_FOUND),
        );

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Network { status, .. } if status == StatusCode::NOT_FOUND));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_json_url_is_plain_get() {
        let transport = MockTransport::new();
        let mut stream = client(&transport).fetch_json_url("http://x/items");
        assert!(futures::poll!(stream.next()).is_pending());

        let (request, completion) = transport.take();
        assert_eq!(request.method(), &http::Method::GET);
        assert!(request.headers().is_empty());
        assert!(request.body_bytes().is_none());

        completion.succeed(
            Some(Bytes::from_static(br#"{"a":1}"#)),
            ResponseMetadata::from_status(StatusCode::OK),
        );
        assert_eq!(stream.next().await.unwrap().unwrap(), json!({"a": 1}));
        assert!(stream.next().await.is_none());
    }

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Item {
        name: String,
    }

    #[tokio::test]
    async fn test_fetch_json_into_named_type() {
        let transport = MockTransport::new();
        let mut stream = client(&transport).fetch_json::<Item>(Request::get("http://x/item"));
        assert!(futures::poll!(stream.next()).is_pending());

        let (_, completion) = transport.take();
        completion.succeed(
            Some(Bytes::from_static(br#"{"name":"widget"}"#)),
            ResponseMetadata::from_status(StatusCode::OK),
        );

        let item = stream.next().await.unwrap().unwrap();
        assert_eq!(item, Item { name: "widget".into() });
    }

    #[tokio::test]
    async fn test_fetch_json_malformed() {
        let transport = MockTransport::new();
        let mut stream = client(&transport).fetch_json::<serde_json::Value>(Request::get("http://x"));
        assert!(futures::poll!(stream.next()).is_pending());

        let (_, completion) = transport.take();
        completion.succeed(
            Some(Bytes::from_static(br#"{"a":"#)),
            ResponseMetadata::from_status(StatusCode::OK),
        );

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_dropping_outer_stage_cancels_transport() {
        let transport = MockTransport::new();
        let mut stream = client(&transport).fetch_json_url("http://x/slow");
        assert!(futures::poll!(stream.next()).is_pending());

        drop(stream);
        assert_eq!(transport.cancelled(), 1);
    }

    #[tokio::test]
    async fn test_cancel_through_stages_then_logged() {
        let transport = MockTransport::new();
        let sink = MemorySink::new();
        let client = HttpClient::new(
            transport.clone(),
            ClientConfig::new().log_requests(true).log_sink(sink.clone()),
        );

        let mut stream = client.fetch_body(Request::get("http://x/slow"));
        assert!(futures::poll!(stream.next()).is_pending());
        stream.get_mut().cancel();
        assert!(stream.next().await.is_none());

        let (_, completion) = transport.take();
        completion.fail(TransportError::Cancelled);

        assert_eq!(transport.cancelled(), 1);
        let lines = sink.lines();
        assert!(lines[1].starts_with("Cancelled ("));
    }

    #[tokio::test]
    async fn test_transport_error_through_all_stages() {
        let transport = MockTransport::new();
        let mut stream = client(&transport).fetch_json_url("http://x");
        assert!(futures::poll!(stream.next()).is_pending());

        let (_, completion) = transport.take();
        completion.fail(TransportError::Connect("refused".into()));

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Connect(_))));
        assert!(stream.next().await.is_none());
    }
}
