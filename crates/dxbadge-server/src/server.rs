//! Connection lifecycle management
//!
//! Owns the listening socket and walks every accepted connection through
//! translate -> handler -> emit. Any failure up to and including the
//! handler is caught here, once, and replaced by the fixed 500 response;
//! a failure on one connection never affects another.

use crate::config::ServerConfig;
use crate::emit::{emit, ServeBody};
use crate::translate::translate;
use anyhow::Context as _;
use dxbadge_core::{Handler, Response, ResponseBuilder, StatusCode};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Body of the fixed 500 response, emitted as a literal so the field order
/// on the wire is stable.
pub const INTERNAL_ERROR_BODY: &str = r#"{"status":"error","message":"Internal Server Error"}"#;

/// Tracks active connections for graceful shutdown
///
/// Used to:
/// - Count active connections
/// - Signal shutdown to reject new connections
/// - Wait for existing connections to drain
#[derive(Debug, Default)]
pub struct ConnectionTracker {
    /// Active connection count
    active: AtomicU64,
    /// Shutdown signal received
    shutting_down: AtomicBool,
}

impl ConnectionTracker {
    /// Create a new connection tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment active connection count
    pub fn increment(&self) {
        self.active.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement active connection count
    pub fn decrement(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    /// Get current active connection count
    pub fn count(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    /// Signal that shutdown is in progress
    pub fn start_shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
    }

    /// Check if shutdown is in progress
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }
}

/// Process-scoped server lifecycle: the listening socket is bound once at
/// startup and closed once at shutdown, and is the only resource shared
/// across connection lifecycles.
pub struct Server {
    listener: TcpListener,
    handler: Handler,
    port: u16,
    tracker: Arc<ConnectionTracker>,
}

impl Server {
    /// Bind the listening socket
    pub async fn bind(config: &ServerConfig, handler: Handler) -> anyhow::Result<Self> {
        let addr = config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind to {addr}"))?;

        Ok(Self {
            listener,
            handler,
            port: config.port,
            tracker: Arc::new(ConnectionTracker::new()),
        })
    }

    /// Local address the listener is bound to
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until `shutdown` resolves, then stop accepting
    /// and wait for in-flight connections to drain before returning.
    ///
    /// There is no drain deadline: a connection that never finishes blocks
    /// exit.
    pub async fn run<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        let Server {
            listener,
            handler,
            port,
            tracker,
        } = self;

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                result = listener.accept() => {
                    let (stream, _) = match result {
                        Ok(conn) => conn,
                        Err(e) => {
                            warn!(error = %e, "failed to accept connection");
                            continue;
                        }
                    };

                    // Reject new connections during shutdown
                    if tracker.is_shutting_down() {
                        drop(stream);
                        continue;
                    }

                    let handler = handler.clone();
                    let conn_tracker = tracker.clone();
                    conn_tracker.increment();

                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);
                        let service = service_fn(move |req| {
                            let handler = handler.clone();
                            async move { Ok::<_, Infallible>(dispatch(handler, req, port).await) }
                        });

                        if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                            // Only log if not a normal connection close
                            if !e.to_string().contains("connection closed") {
                                error!(error = %e, "connection error");
                            }
                        }

                        conn_tracker.decrement();
                    });
                }

                _ = &mut shutdown => {
                    tracker.start_shutdown();
                    break;
                }
            }
        }

        // Stop listening before draining; in-flight connections finish below.
        drop(listener);

        info!(active = tracker.count(), "draining in-flight connections");
        drain(&tracker).await;
        info!("all connections drained");

        Ok(())
    }
}

/// Wait for every in-flight connection to settle. No deadline.
async fn drain(tracker: &ConnectionTracker) {
    while tracker.count() > 0 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// One full request cycle: translate, invoke the handler, emit.
///
/// Translation and handler failures are caught here exactly once and
/// converted to the fixed 500 response; no retry.
pub async fn dispatch<B>(
    handler: Handler,
    req: http::Request<B>,
    port: u16,
) -> http::Response<ServeBody>
where
    B: http_body::Body + Unpin,
    B::Error: std::fmt::Display,
{
    info!(method = %req.method(), path = %req.uri().path(), "incoming request");

    let outcome = match translate(req, port).await {
        Ok(request) => handler(request).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(response) => emit(response),
        Err(e) => {
            error!(error = %e, "handler failed");
            emit(internal_error_response())
        }
    }
}

/// The fixed 500 emitted for any uncaught handler failure
fn internal_error_response() -> Response {
    ResponseBuilder::new(StatusCode::INTERNAL_SERVER_ERROR)
        .header("content-type", "application/json")
        .body(INTERNAL_ERROR_BODY)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use dxbadge_core::{Error, Response};
    use futures::stream;
    use http_body::Frame;
    use http_body_util::{BodyExt, Empty, StreamBody};

    fn failing_handler() -> Handler {
        Arc::new(|_req| Box::pin(async { Err(Error::Internal("boom".to_string())) }))
    }

    fn echo_handler() -> Handler {
        Arc::new(|req| {
            Box::pin(async move {
                Ok(Response::text(req.body.unwrap_or_else(|| "no body".to_string())))
            })
        })
    }

    async fn body_text(res: http::Response<ServeBody>) -> String {
        let collected = res.into_body().collect().await.unwrap();
        String::from_utf8(collected.to_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_tracker_counts_and_shutdown_flag() {
        let tracker = ConnectionTracker::new();
        assert_eq!(tracker.count(), 0);
        assert!(!tracker.is_shutting_down());

        tracker.increment();
        tracker.increment();
        tracker.decrement();
        assert_eq!(tracker.count(), 1);

        tracker.start_shutdown();
        assert!(tracker.is_shutting_down());
    }

    #[tokio::test]
    async fn test_handler_failure_yields_fixed_500() {
        let req = http::Request::builder()
            .method("GET")
            .uri("/")
            .body(Empty::<Bytes>::new())
            .unwrap();

        let res = dispatch(failing_handler(), req, 3000).await;
        assert_eq!(res.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            res.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(body_text(res).await, INTERNAL_ERROR_BODY);
    }

    #[tokio::test]
    async fn test_body_read_failure_yields_fixed_500() {
        let frames: Vec<std::result::Result<Frame<Bytes>, std::io::Error>> =
            vec![Err(std::io::Error::other("peer reset"))];
        let req = http::Request::builder()
            .method("POST")
            .uri("/")
            .body(StreamBody::new(stream::iter(frames)))
            .unwrap();

        let res = dispatch(echo_handler(), req, 3000).await;
        assert_eq!(res.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(res).await, INTERNAL_ERROR_BODY);
    }

    #[tokio::test]
    async fn test_successful_handler_response_passes_through() {
        let req = http::Request::builder()
            .method("POST")
            .uri("/")
            .body(http_body_util::Full::new(Bytes::from("payload")))
            .unwrap();

        let res = dispatch(echo_handler(), req, 3000).await;
        assert_eq!(res.status(), http::StatusCode::OK);
        assert_eq!(body_text(res).await, "payload");
    }
}
