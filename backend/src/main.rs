//! Backend entry-point: wires REST endpoints, the stock feed WebSocket, and
//! OpenAPI docs.

use actix_web::web;
use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use kiosk_backend::config::AppSettings;
use ortho_config::OrthoConfig;
use kiosk_backend::inbound::http::health::HealthState;
use kiosk_backend::outbound::persistence::{DbPool, PoolConfig};
use kiosk_backend::server::{ServerConfig, create_server};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(std::io::Error::other)?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| std::io::Error::other(format!("invalid bind address: {e}")))?;

    let mut config = ServerConfig::new(bind_addr);
    if let Some(database_url) = settings.database_url.as_deref() {
        migrate_schema(database_url)?;
        let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
            .await
            .map_err(|e| std::io::Error::other(format!("create database pool: {e}")))?;
        config = config.with_db_pool(pool);
    } else {
        info!("no database configured; serving from in-memory repositories");
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(make_metrics));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}

/// Run all pending Diesel migrations against the configured database.
///
/// Uses a synchronous connection; migrations run once before the async pool
/// is built.
fn migrate_schema(database_url: &str) -> std::io::Result<()> {
    let mut connection = PgConnection::establish(database_url)
        .map_err(|e| std::io::Error::other(format!("connect for migrations: {e}")))?;
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| std::io::Error::other(format!("run migrations: {e}")))?;
    if !applied.is_empty() {
        info!(count = applied.len(), "applied pending migrations");
    }
    Ok(())
}

/// Build metrics via the provided constructor, logging and continuing on
/// failure so a metrics misconfiguration never blocks startup.
#[cfg(feature = "metrics")]
fn initialize_metrics<E: std::fmt::Display>(
    make: impl FnOnce() -> Result<actix_web_prom::PrometheusMetrics, E>,
) -> Option<actix_web_prom::PrometheusMetrics> {
    match make() {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            warn!(error = %e, "metrics initialisation failed; continuing without");
            None
        }
    }
}

#[cfg(feature = "metrics")]
fn make_metrics()
-> Result<actix_web_prom::PrometheusMetrics, Box<dyn std::error::Error + Send + Sync>> {
    actix_web_prom::PrometheusMetricsBuilder::new("kiosk")
        .endpoint("/metrics")
        .build()
}
