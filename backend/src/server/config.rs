//! Process configuration.
//!
//! Plain settings load through `ortho_config` with the `FREE2FREE_` prefix.
//! Secrets are read separately in [`super::secrets`].

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use free2free::domain::TokenCodec;
use free2free::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("FREE2FREE_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("JWT_SECRET or JWT_SECRET_FILE must be set")]
    MissingJwtSecret,
    #[error("failed to read JWT secret file {path}: {source}")]
    JwtSecretRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JWT secret is {length} bytes; at least {min} are required")]
    JwtSecretTooShort { length: usize, min: usize },
}

/// Settings loaded from CLI flags, config files, and `FREE2FREE_*` variables.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FREE2FREE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| ConfigError::InvalidBindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)
    }

    pub fn pool_config(&self) -> Result<PoolConfig, ConfigError> {
        Ok(PoolConfig::new(self.database_url()?).with_max_size(self.db_max_connections))
    }
}

/// Everything [`super::create_server`] needs besides the database pool.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) codec: Arc<TokenCodec>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        codec: Arc<TokenCodec>,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            codec,
        }
    }
}
