//! Process settings loaded once at startup via OrthoConfig.
//!
//! Sources, lowest precedence first: config file, `BOOKSTORE_*` environment
//! variables, command-line flags. Nothing below `main` reads the environment;
//! these settings are turned into a [`super::ServerConfig`].

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Deserialize;
use tracing::warn;

use crate::domain::SigningSecret;
use crate::outbound::persistence::PoolConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

const EPHEMERAL_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
    #[error("BOOKSTORE_JWT_SECRET must be set to a non-empty value")]
    MissingJwtSecret,
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKSTORE")]
pub struct ServerSettings {
    /// Socket address to listen on.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: String,
    /// PostgreSQL URL. Without it the process keeps data in memory.
    pub database_url: Option<String>,
    /// HMAC secret for signing bearer tokens.
    pub jwt_secret: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.trim();
        raw.parse().map_err(|err: std::net::AddrParseError| {
            SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            }
        })
    }

    /// The configured secret, or in debug builds a random per-process one.
    pub fn signing_secret(&self) -> Result<SigningSecret, SettingsError> {
        self.resolve_secret(cfg!(debug_assertions))
    }

    fn resolve_secret(&self, allow_ephemeral: bool) -> Result<SigningSecret, SettingsError> {
        match self.jwt_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => Ok(SigningSecret::new(secret.as_bytes())),
            _ if allow_ephemeral => {
                warn!("BOOKSTORE_JWT_SECRET not set; tokens will not survive a restart (dev only)");
                let mut bytes = vec![0_u8; EPHEMERAL_SECRET_LEN];
                OsRng.fill_bytes(&mut bytes);
                Ok(SigningSecret::new(bytes))
            }
            _ => Err(SettingsError::MissingJwtSecret),
        }
    }

    /// Pool settings for `database_url`, if one is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        let config = PoolConfig::new(url);
        Some(match self.db_max_connections {
            Some(max) => config.with_max_connections(max),
            None => config,
        })
    }
}
