//! Outgoing transport emission
//!
//! Drains an immutable [`Response`] value back onto the hyper connection.
//! Status and headers are written first; a streamed body is pumped one
//! chunk at a time — the next chunk is requested only after the previous
//! one has been consumed by the connection, and the output terminates
//! exactly once when the source completes.

use bytes::Bytes;
use dxbadge_core::{Body, ChunkStream, Error, Response};
use futures::Stream;
use http::header::{HeaderName, HeaderValue};
use http_body_util::Full;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Response body handed to hyper: empty, buffered, or a chunk pump.
pub enum ServeBody {
    /// No body; output terminates immediately
    Empty,
    /// Pre-materialized body, emitted as a single frame
    Full(Full<Bytes>),
    /// Chunk stream, polled one chunk at a time with no whole-body buffering
    Streaming(ChunkStream),
}

impl http_body::Body for ServeBody {
    type Data = Bytes;
    type Error = Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            Self::Empty => Poll::Ready(None),
            Self::Full(full) => Pin::new(full)
                .poll_frame(cx)
                .map_err(|never| match never {}),
            Self::Streaming(source) => match source.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    Poll::Ready(Some(Ok(http_body::Frame::data(chunk))))
                }
                Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Pending => Poll::Pending,
            },
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Full(full) => full.is_end_stream(),
            Self::Streaming(_) => false,
        }
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match self {
            Self::Empty => http_body::SizeHint::with_exact(0),
            Self::Full(full) => full.size_hint(),
            Self::Streaming(_) => http_body::SizeHint::default(),
        }
    }
}

/// Convert a [`Response`] value into the hyper representation.
///
/// Names with multiple values become one header line per value, in the
/// order they were appended.
pub fn emit(res: Response) -> http::Response<ServeBody> {
    let status = http::StatusCode::from_u16(res.status.as_u16())
        .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

    let body = match res.body {
        Body::Empty => ServeBody::Empty,
        Body::Full(bytes) => ServeBody::Full(Full::new(bytes)),
        Body::Stream(source) => ServeBody::Streaming(source),
    };

    let mut response = http::Response::new(body);
    *response.status_mut() = status;

    for (name, value) in res.headers.iter() {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            response.headers_mut().append(name, value);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxbadge_core::{ResponseBuilder, StatusCode};
    use futures::stream;
    use http_body_util::BodyExt;

    #[test]
    fn test_emit_maps_status_and_headers() {
        let res = ResponseBuilder::new(StatusCode::NOT_FOUND)
            .header("content-type", "application/json")
            .body("{}")
            .build();

        let emitted = emit(res);
        assert_eq!(emitted.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(
            emitted.headers().get("content-type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_emit_preserves_multi_value_header_order() {
        let res = ResponseBuilder::new(StatusCode::OK)
            .header("x-tag", "a")
            .header("x-tag", "b")
            .build();

        let emitted = emit(res);
        let values: Vec<&str> = emitted
            .headers()
            .get_all("x-tag")
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn test_out_of_range_status_degrades_to_500() {
        let res = Response::new(StatusCode(999));
        let emitted = emit(res);
        assert_eq!(emitted.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_empty_body_terminates_immediately() {
        let body = ServeBody::Empty;
        assert!(http_body::Body::is_end_stream(&body));
        assert_eq!(http_body::Body::size_hint(&body).exact(), Some(0));
    }

    #[tokio::test]
    async fn test_full_body_emits_one_frame() {
        let res = ResponseBuilder::new(StatusCode::OK).body("hello").build();
        let mut body = emit(res).into_body();

        let frame = body.frame().await.unwrap().unwrap();
        assert_eq!(frame.into_data().unwrap(), Bytes::from("hello"));
        assert!(body.frame().await.is_none());
    }

    #[tokio::test]
    async fn test_streaming_body_yields_each_chunk_in_order_then_ends_once() {
        let chunks = vec![
            Ok(Bytes::from("alpha")),
            Ok(Bytes::from("beta")),
            Ok(Bytes::from("gamma")),
        ];
        let res = ResponseBuilder::new(StatusCode::OK)
            .stream(stream::iter(chunks))
            .build();
        let mut body = emit(res).into_body();

        let mut seen = Vec::new();
        while let Some(frame) = body.frame().await {
            seen.push(frame.unwrap().into_data().unwrap());
        }

        assert_eq!(
            seen,
            vec![Bytes::from("alpha"), Bytes::from("beta"), Bytes::from("gamma")]
        );
        // The source signalled completion; any further poll stays terminal.
        assert!(body.frame().await.is_none());
    }

    #[tokio::test]
    async fn test_streaming_body_surfaces_source_errors() {
        let chunks = vec![
            Ok(Bytes::from("head")),
            Err(Error::Internal("source failed".to_string())),
        ];
        let res = ResponseBuilder::new(StatusCode::OK)
            .stream(stream::iter(chunks))
            .build();
        let mut body = emit(res).into_body();

        assert!(body.frame().await.unwrap().is_ok());
        assert!(body.frame().await.unwrap().is_err());
    }
}
