//! Error types for dxbadge-core

use thiserror::Error;

/// Result type alias for dxbadge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by the transport adapter and the request handlers
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid HTTP method
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Invalid header name or value
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Request body stream failed while buffering
    #[error("Body read error: {0}")]
    BodyRead(String),

    /// Rating API failure
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
