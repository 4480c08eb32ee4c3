//! dxbadge server entry point
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HOST` | `0.0.0.0` | Bind hostname |
//! | `PORT` | `3000` | Bind port |
//! | `LUOXUE_API_KEY` | *(unset)* | Authorization key for the LuoXue rating API |
//! | `PLATE_ASSET_BASE` | LuoXue asset host | Base URL for plate artwork |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use anyhow::Result;
use dxbadge_server::app::App;
use dxbadge_server::config::ServerConfig;
use dxbadge_server::server::Server;
use dxbadge_server::{init_tracing, shutdown};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env();
    init_tracing(&config.log_level)?;

    let app = Arc::new(App::new(&config));
    let server = Server::bind(&config, app.into_handler()).await?;
    let addr = server.local_addr()?;

    info!(%addr, "dxbadge server running");
    info!("available endpoints:");
    info!("  GET  /");
    info!("  GET  /api/getRating/:friendCode");
    info!("  GET  /api/genImage/:friendCode");
    info!("  GET  /api/luoxue/getRating/:friendCode");
    info!("  GET  /api/luoxue/genImage/:friendCode");

    server.run(shutdown::wait_for_signal()).await?;

    info!("server closed");
    Ok(())
}
