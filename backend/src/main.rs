//! Bookstore entry-point: loads settings, prepares storage and serves HTTP.

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bookstore::inbound::http::health::HealthState;
use bookstore::outbound::persistence::{DbPool, run_pending_migrations};
use bookstore::server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let secret = settings.signing_secret().map_err(io::Error::other)?;

    let mut config = ServerConfig::new(bind_addr, secret);
    if let Some(pool_config) = settings.pool_config() {
        let url = pool_config.database_url().to_owned();
        let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .map_err(io::Error::other)?
            .map_err(io::Error::other)?;
        info!(applied, "database migrations complete");

        let pool = DbPool::new(pool_config).await.map_err(io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "listening");
    server.await
}
