//! Application configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Interface address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    // === Store ===
    /// Start with the two sample items.
    #[serde(default = "default_true")]
    pub seed_sample_items: bool,

    // === API Docs ===
    /// Serve Swagger UI and the OpenAPI document.
    #[serde(default = "default_true")]
    pub swagger_ui: bool,

    // === Logging ===
    /// Log filter (trace, debug, info, warn, error, or directives).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            seed_sample_items: true,
            swagger_ui: true,
            rust_log: default_log_level(),
            verbose: false,
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> std::result::Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.host.parse::<IpAddr>().is_err() {
            return Err(format!("HOST must be an IP address, got {:?}", self.host));
        }

        if self.rust_log.trim().is_empty() {
            return Err("RUST_LOG must not be empty".to_string());
        }

        Ok(())
    }

    /// Validate, turning a rejection into an [`AppError`].
    pub fn checked(self) -> Result<Self> {
        self.validate().map_err(AppError::InvalidConfig)?;
        Ok(self)
    }

    /// Address to bind the HTTP server to.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|e| {
            AppError::InvalidConfig(format!("invalid HOST {:?}: {}", self.host, e))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
