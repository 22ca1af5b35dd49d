//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address (PORT env var, default 3000)
    pub server_addr: SocketAddr,
    /// Environment name reported by the status endpoint
    pub environment: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Directory of static client assets served over HTTP
    pub static_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let port: u16 = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => 3000,
        };

        Ok(Self {
            server_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT is not a valid port number: {0}")]
    InvalidPort(String),
}
