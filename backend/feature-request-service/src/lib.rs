/// Feature Request Service Library
///
/// Lets clients propose feature requests, upvote them, and read them back
/// ranked by popularity.
///
/// # Modules
///
/// - `db`: the `FeatureStore` trait and its PostgreSQL / in-memory engines
/// - `services`: ranking layer and the `FeatureService` facade
/// - `handlers`: HTTP request handlers
/// - `models`: feature request records and request bodies
/// - `error`: store and HTTP error types
/// - `config`: configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result, StoreError, StoreResult};

use anyhow::Context;
use config::StoreBackend;
use db::{FeatureStore, MemoryFeatureStore, PgFeatureStore};
use std::sync::Arc;
use std::time::Duration;

/// Construct the store selected by `config`.
///
/// For PostgreSQL this connects the pool and applies migrations. The caller
/// owns the returned store and is responsible for calling
/// [`FeatureStore::close`] on shutdown.
pub async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn FeatureStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory feature store; data is lost on restart");
            Ok(Arc::new(MemoryFeatureStore::new()))
        }
        StoreBackend::Postgres => {
            let db_cfg = config
                .database
                .as_ref()
                .context("postgres backend selected without database configuration")?;
            db_cfg.log_config();

            let pool = db_pool::create_pool(db_cfg)
                .await
                .context("Failed to create PostgreSQL pool")?;

            // Covers pool acquisition plus the server-side statement timeout
            let deadline = Duration::from_secs(db_cfg.acquire_timeout_secs)
                + config.store.operation_timeout() * 2;
            let store = PgFeatureStore::new(pool, deadline);

            store
                .migrate()
                .await
                .context("Failed to run feature-request migrations")?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(store))
        }
    }
}
