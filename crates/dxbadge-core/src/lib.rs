//! dxbadge-core: platform-agnostic HTTP core for the dxbadge rating service
//!
//! The request/response value types here are what the application handler
//! is written against. Host transports adapt their native connection
//! representation to these types at the process edge, so the same handler
//! runs unchanged under any transport.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod error;
pub mod headers;
pub mod request;
pub mod response;
pub mod router;

// Re-exports
pub use error::{Error, Result};
pub use headers::{Headers, RawValue};
pub use request::{Method, Request, RequestBuilder};
pub use response::{Body, ChunkStream, Response, ResponseBuilder, StatusCode};
pub use router::{Match, Router};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by a request handler
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response>> + Send>>;

/// Black-box request handler: one immutable request in, one response (or
/// failure) out. The transport adapter never looks inside.
pub type Handler = Arc<dyn Fn(Request) -> HandlerFuture + Send + Sync>;
