//! Backend entry-point: loads settings, migrates the schema and serves the
//! notes API.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use household_notes::inbound::http::health::HealthState;
use household_notes::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use household_notes::settings::AppSettings;

use server::{ServerConfig, create_server};

fn init_tracing(settings: &AppSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.default_log_filter()));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let settings = AppSettings::load().map_err(|e| io::Error::other(e.to_string()))?;
    init_tracing(&settings);

    let database_url = settings
        .database_url()
        .map_err(|e| io::Error::other(e.to_string()))?;

    let migration_url = database_url.clone();
    let applied = web::block(move || run_migrations(&migration_url))
        .await
        .map_err(io::Error::other)?
        .map_err(io::Error::other)?;
    info!(count = applied.len(), versions = ?applied, "database migrations applied");

    let db_pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(io::Error::other)?;

    let config =
        ServerConfig::from_settings(&settings, db_pool).map_err(io::Error::other)?;
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
