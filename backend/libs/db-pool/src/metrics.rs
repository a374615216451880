//! Prometheus metrics for database connection pool
//!
//! Tracks pool size by connection state

use prometheus::{register_int_gauge_vec, IntGaugeVec};
use sqlx::PgPool;
use std::time::Duration;

lazy_static::lazy_static! {
    /// Database connection pool size by state (idle/active/max)
    static ref DB_POOL_CONNECTIONS: IntGaugeVec = register_int_gauge_vec!(
        "db_pool_connections",
        "Database pool connection count by state",
        &["service", "state"]
    ).expect("Prometheus metrics registration should succeed at startup");
}

pub(crate) fn update_pool_metrics(pool: &PgPool, service: &str) {
    let size = pool.size() as i64;
    let idle = pool.num_idle() as i64;

    DB_POOL_CONNECTIONS
        .with_label_values(&[service, "idle"])
        .set(idle);

    DB_POOL_CONNECTIONS
        .with_label_values(&[service, "active"])
        .set(size - idle);

    DB_POOL_CONNECTIONS
        .with_label_values(&[service, "max"])
        .set(pool.options().get_max_connections() as i64);
}

/// Refresh pool gauges every `period` until the pool is closed
pub(crate) fn spawn_pool_metrics_updater(pool: PgPool, service: String, period: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        while !pool.is_closed() {
            interval.tick().await;
            update_pool_metrics(&pool, &service);
        }
    });
}
