use super::FeatureStore;
use crate::error::{StoreError, StoreResult};
use crate::models::{FeatureRequest, NewFeatureRequest};
use async_trait::async_trait;
use sqlx::PgPool;
use std::future::Future;
use std::time::Duration;

/// PostgreSQL-backed feature store
///
/// Vote increments are delegated to the database as one atomic
/// `UPDATE ... RETURNING` statement, so no read-modify-write happens in this
/// process. Each statement is bounded by the server-side `statement_timeout`
/// configured on the pool; `deadline` is a client-side backstop for a
/// connection that stops answering altogether.
#[derive(Clone)]
pub struct PgFeatureStore {
    pool: PgPool,
    deadline: Duration,
}

impl PgFeatureStore {
    pub fn new(pool: PgPool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }

    /// Apply embedded schema migrations
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    async fn bounded<T, F>(&self, query: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match tokio::time::timeout(self.deadline, query).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Transient(format!(
                "storage did not respond within {}ms",
                self.deadline.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl FeatureStore for PgFeatureStore {
    async fn insert(&self, new: NewFeatureRequest) -> StoreResult<FeatureRequest> {
        self.bounded(
            sqlx::query_as::<_, FeatureRequest>(
                r#"
                INSERT INTO features (title, description)
                VALUES ($1, $2)
                RETURNING id, title, description, votes, created_at
                "#,
            )
            .bind(new.title())
            .bind(new.description())
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn increment_vote(&self, id: i64) -> StoreResult<FeatureRequest> {
        self.bounded(
            sqlx::query_as::<_, FeatureRequest>(
                r#"
                UPDATE features
                SET votes = votes + 1
                WHERE id = $1
                RETURNING id, title, description, votes, created_at
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await?
        .ok_or(StoreError::NotFound(id))
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<FeatureRequest> {
        self.bounded(
            sqlx::query_as::<_, FeatureRequest>(
                r#"
                SELECT id, title, description, votes, created_at
                FROM features
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await?
        .ok_or(StoreError::NotFound(id))
    }

    async fn list_all(&self) -> StoreResult<Vec<FeatureRequest>> {
        self.bounded(
            sqlx::query_as::<_, FeatureRequest>(
                r#"
                SELECT id, title, description, votes, created_at
                FROM features
                "#,
            )
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn ping(&self) -> StoreResult<()> {
        if self.pool.is_closed() {
            return Err(StoreError::Transient("database pool is closed".to_string()));
        }
        self.bounded(sqlx::query("SELECT 1").execute(&self.pool))
            .await
            .map(|_| ())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
