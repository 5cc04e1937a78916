//! bb8 pool of `diesel-async` PostgreSQL connections shared by both
//! repositories.
//!
//! A checkout waits at most [`CHECKOUT_TIMEOUT`]; nothing else in the
//! persistence layer times out or retries.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Connections kept when `BOOKSTORE_DB_MAX_CONNECTIONS` is unset.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
/// Longest a request waits for a free connection.
pub const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure to create the pool or to borrow from it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("invalid connection pool settings: {message}")]
    Setup { message: String },
    #[error("no database connection available: {message}")]
    Unavailable { message: String },
}

impl PoolError {
    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Setup { message } | Self::Unavailable { message } => message,
        }
    }
}

/// Where the catalogue lives and how many connections it may hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    database_url: String,
    max_connections: u32,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Cap the pool size; zero is raised to one.
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }
}

/// Cloneable handle; clones share the same connections.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool lazily; no connection is opened until the first
    /// checkout.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let PoolConfig {
            database_url,
            max_connections,
        } = config;
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);

        Pool::builder()
            .max_size(max_connections)
            .min_idle(None)
            .connection_timeout(CHECKOUT_TIMEOUT)
            .build(manager)
            .await
            .map(|inner| Self { inner })
            .map_err(|err| PoolError::setup(err.to_string()))
    }

    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::unavailable(err.to_string()))
    }
}
