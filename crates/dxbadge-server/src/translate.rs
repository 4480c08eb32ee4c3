//! Incoming transport translation
//!
//! Converts a streaming hyper request into the immutable [`Request`] value
//! the handler is written against. Bodiless methods resolve immediately;
//! everything else suspends until the body stream is fully drained, so the
//! handler never observes a partial body.
//!
//! There is deliberately no read timeout and no size cap here: a client
//! that never finishes its body starves that request indefinitely.

use dxbadge_core::{Error, Headers, Method, RawValue, Request, Result};
use http_body_util::BodyExt;
use std::collections::HashMap;

/// Transport scheme; plaintext vs. encrypted is a deployment-time choice,
/// not negotiated per request.
const SCHEME: &str = "http";

/// Translate one accepted transport request into a [`Request`] value.
///
/// Suspends until the body is fully buffered for non-bodiless methods.
pub async fn translate<B>(req: http::Request<B>, port: u16) -> Result<Request>
where
    B: http_body::Body + Unpin,
    B::Error: std::fmt::Display,
{
    let (parts, body) = req.into_parts();
    let method = Method::from_str(parts.method.as_str())?;
    let headers = normalize_headers(&parts.headers);

    let path = parts.uri.path().to_string();
    let query = parts.uri.query().map(|s| s.to_string());

    let host = headers
        .get("host")
        .map(str::to_string)
        .unwrap_or_else(|| format!("localhost:{port}"));
    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());
    let url = format!("{SCHEME}://{host}{target}");

    let body = if method.is_bodiless() {
        None
    } else {
        Some(read_body_text(body).await?)
    };

    Ok(Request {
        method,
        url,
        path,
        query,
        headers,
        body,
        params: HashMap::new(),
    })
}

/// Fold the host header map into the canonical multi-map.
///
/// Each name is modelled as absent, single-valued, or multi-valued and
/// handled exhaustively by the normalizer, so multi-valued names keep
/// their value order.
fn normalize_headers(map: &http::HeaderMap) -> Headers {
    let raw = map.keys().map(|name| {
        let mut values: Vec<String> = map
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect();
        let value = match values.len() {
            0 => RawValue::Absent,
            1 => RawValue::Single(values.remove(0)),
            _ => RawValue::Many(values),
        };
        (name.as_str().to_string(), value)
    });
    Headers::from_raw(raw)
}

/// Accumulate the body chunk stream, in arrival order, into one text buffer.
///
/// Resolves only after the stream signals completion; chunks are never
/// reordered. Binary payloads are out of scope, so the buffer is decoded
/// lossily as UTF-8.
async fn read_body_text<B>(body: B) -> Result<String>
where
    B: http_body::Body + Unpin,
    B::Error: std::fmt::Display,
{
    let mut body = body;
    let mut buf = Vec::new();

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(|e| Error::BodyRead(e.to_string()))?;
        if let Ok(data) = frame.into_data() {
            bytes::BufMut::put(&mut buf, data);
        }
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}
