//! dxbadge-server: tokio/hyper host adapter for the dxbadge service
//!
//! The application handler (`app`) is written against `dxbadge-core`'s
//! platform-agnostic types; this crate binds it to a streaming socket
//! transport. `translate` buffers incoming bodies into immutable request
//! values, `emit` pumps response streams back onto the connection chunk by
//! chunk, and `server` owns the listening socket and the per-connection
//! lifecycle, including the fixed 500 for uncaught handler failures.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod app;
pub mod config;
pub mod emit;
pub mod server;
pub mod shutdown;
pub mod translate;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config
/// value.
pub fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}
