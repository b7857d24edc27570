//! Configuration management for Soyfr.
//!
//! All configuration is driven by environment variables.

use std::net::SocketAddr;

use crate::error::{CoreError, CoreResult};

/// Global configuration for the Soyfr server.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoyfrConfig {
    /// Bind address for the server.
    pub listen: String,
    /// Path prefix for API routes.
    pub api_prefix: String,
    /// Log level, used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for SoyfrConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8800".to_owned(),
            api_prefix: "api/v1".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl SoyfrConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("SOYFR_LISTEN") {
            config.listen = v;
        }
        if let Some(v) = lookup("SOYFR_API_PREFIX") {
            config.api_prefix = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] when `listen` is not a socket address.
    pub fn listen_addr(&self) -> CoreResult<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| CoreError::Config(format!("invalid listen address {}: {e}", self.listen)))
    }
}
