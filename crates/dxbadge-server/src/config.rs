//! Environment-backed server configuration
//!
//! `ServerConfig::from_env` is the single point where the process
//! environment is read; everything downstream receives the config by value.

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

const DEFAULT_HOSTNAME: &str = "0.0.0.0";
const DEFAULT_PLATE_ASSET_BASE: &str = "https://assets.lxns.net/maimai/rating";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime configuration for the dxbadge server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen port (`PORT`)
    pub port: u16,
    /// Listen hostname (`HOST`)
    pub hostname: String,
    /// API key forwarded to the LuoXue rating API (`LUOXUE_API_KEY`)
    pub luoxue_api_key: Option<String>,
    /// Base URL for plate artwork referenced from generated SVGs
    /// (`PLATE_ASSET_BASE`)
    pub plate_asset_base: String,
    /// Log level filter (`LOG_LEVEL`, overridden by `RUST_LOG`)
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            hostname: DEFAULT_HOSTNAME.to_string(),
            luoxue_api_key: None,
            plate_asset_base: DEFAULT_PLATE_ASSET_BASE.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self {
            port: parse_port(std::env::var("PORT").ok().as_deref()),
            hostname: std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOSTNAME.to_string()),
            luoxue_api_key: std::env::var("LUOXUE_API_KEY").ok(),
            plate_asset_base: std::env::var("PLATE_ASSET_BASE")
                .unwrap_or_else(|_| DEFAULT_PLATE_ASSET_BASE.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Bind address as `hostname:port`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

/// Parse a port value, falling back to the default for absent or
/// unparseable input.
fn parse_port(raw: Option<&str>) -> u16 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(DEFAULT_PORT)
}
