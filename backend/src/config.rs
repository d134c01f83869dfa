//! Runtime configuration loaded via OrthoConfig.
//!
//! Settings merge command-line flags, `KIOSK_`-prefixed environment
//! variables, and configuration files, with the command line winning.
//! Every field is optional; accessors supply the defaults so a bare
//! environment boots a fully in-memory server.

use std::net::{AddrParseError, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Configuration values controlling server startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "KIOSK")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    #[ortho_config(default = String::from(DEFAULT_BIND_ADDR))]
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. When absent the server runs on the
    /// in-memory repositories.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_max_size: Option<u32>,
}

impl AppSettings {
    /// Return the configured bind address, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`AddrParseError`] when the configured value is not a valid
    /// socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).parse()
    }

    /// Return the configured pool size, falling back to the default.
    #[must_use]
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }
}
