//! Status gate: "2xx is success".

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::Bytes;
use futures::Stream;
use futures::stream::FusedStream;
use pin_project_lite::pin_project;

use crate::error::Error;
use crate::response::RawResponse;

/// Map a raw response to its body if the status is in `[200, 300)`.
///
/// A missing body is an empty body. A missing response is a contract
/// violation by the transport and yields [`Error::InternalContract`].
pub fn check_status(raw: RawResponse) -> Result<Bytes, Error> {
    let (body, metadata) = raw.into_parts();

    let Some(metadata) = metadata else {
        tracing::error!("transport reported success without response metadata");
        return Err(Error::InternalContract("response metadata missing"));
    };

    if metadata.is_success() {
        Ok(body.unwrap_or_default())
    } else {
        Err(Error::Network {
            status: metadata.status(),
            metadata,
        })
    }
}

pin_project! {
    /// Stream of response bodies, failing on non-2xx statuses.
    ///
    /// Created by [`HttpClient::fetch_body`](crate::HttpClient::fetch_body).
    /// Dropping it drops, and therefore cancels, the inner stream.
    #[must_use = "streams do nothing unless polled"]
    #[derive(Debug)]
    pub struct FetchBody<S> {
        #[pin]
        inner: S,
    }
}

impl<S> FetchBody<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S> Stream for FetchBody<S>
where
    S: Stream<Item = Result<RawResponse, Error>>,
{
    type Item = Result<Bytes, Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let item = ready!(self.project().inner.poll_next(cx));
        Poll::Ready(item.map(|result| result.and_then(check_status)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S> FusedStream for FetchBody<S>
where
    S: FusedStream<Item = Result<RawResponse, Error>>,
{
    fn is_terminated(&self) -> bool {
        self.inner.is_terminated()
    }
}
