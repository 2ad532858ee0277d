//! JSON body decoding.

use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::Bytes;
use futures::Stream;
use futures::stream::FusedStream;
use pin_project_lite::pin_project;
use serde::de::DeserializeOwned;

use crate::error::Error;

/// Decode a body as JSON.
///
/// A literal `null` is a valid result when `T` accepts it.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(bytes).map_err(Error::Decode)
}

pin_project! {
    /// Stream of decoded JSON values.
    ///
    /// Created by [`HttpClient::fetch_json`](crate::HttpClient::fetch_json).
    #[must_use = "streams do nothing unless polled"]
    pub struct FetchJson<S, T> {
        #[pin]
        inner: S,
        _marker: PhantomData<fn() -> T>,
    }
}

impl<S, T> FetchJson<S, T> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
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

impl<S, T> Stream for FetchJson<S, T>
where
    S: Stream<Item = Result<Bytes, Error>>,
    T: DeserializeOwned,
{
    type Item = Result<T, Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let item = ready!(self.project().inner.poll_next(cx));
        Poll::Ready(item.map(|result| result.and_then(|body| decode_json(&body))))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S, T> FusedStream for FetchJson<S, T>
where
    S: FusedStream<Item = Result<Bytes, Error>>,
    T: DeserializeOwned,
{
    fn is_terminated(&self) -> bool {
        self.inner.is_terminated()
    }
}

impl<S: std::fmt::Debug, T> std::fmt::Debug for FetchJson<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchJson")
            .field("inner", &self.inner)
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde::Deserialize;
    use serde_json::{Value, json};

    #[test]
    fn test_decode_object() {
        let value: Value = decode_json(br#"{"a":1}"#).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_decode_malformed() {
        let err = decode_json::<Value>(br#"{"a":"#).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_decode_null_is_a_value() {
        let value: Value = decode_json(b"null").unwrap();
        assert!(value.is_null());

        let absent: Option<u32> = decode_json(b"null").unwrap();
        assert_eq!(absent, None);
    }

    #[test]
    fn test_decode_typed() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Item {
            id: u32,
            name: String,
        }

        let item: Item = decode_json(br#"{"id":7,"name":"widget"}"#).unwrap();
        assert_eq!(
            item,
            Item {
                id: 7,
                name: "widget".into()
            }
        );
    }

    #[tokio::test]
    async fn test_stream_decodes_single_body() {
        let upstream = futures::stream::iter(vec![Ok(Bytes::from_static(br#"[1,2,3]"#))]);
        let mut stream = FetchJson::<_, Vec<u8>>::new(upstream);

        assert_eq!(stream.next().await.unwrap().unwrap(), vec![1, 2, 3]);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_empty_body_fails_to_decode() {
        let upstream = futures::stream::iter(vec![Ok(Bytes::new())]);
        let mut stream = FetchJson::<_, Value>::new(upstream);

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
