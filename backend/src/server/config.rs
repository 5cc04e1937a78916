//! HTTP server configuration object.

use std::net::SocketAddr;

use crate::domain::SigningSecret;
use crate::outbound::persistence::DbPool;

/// Everything [`super::create_server`] needs, built once in `main`.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) signing_secret: SigningSecret,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, signing_secret: SigningSecret) -> Self {
        Self {
            bind_addr,
            signing_secret,
            db_pool: None,
        }
    }

    /// Use PostgreSQL-backed repositories instead of the in-memory ones.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[must_use]
    pub fn uses_database(&self) -> bool {
        self.db_pool.is_some()
    }
}
