/// Storage layer for feature requests
///
/// `FeatureStore` is the only owner of the record collection. Two engines
/// implement it:
///
/// - [`PgFeatureStore`]: PostgreSQL, vote increments are a single
///   `UPDATE ... SET votes = votes + 1` statement
/// - [`MemoryFeatureStore`]: in-process map, vote increments run under the
///   record's shard write lock
use crate::error::{StoreError, StoreResult};
use crate::models::{FeatureRequest, NewFeatureRequest};
use async_trait::async_trait;

pub mod feature_repo;
pub mod memory_store;

pub use feature_repo::PgFeatureStore;
pub use memory_store::MemoryFeatureStore;

/// Authoritative collection of feature requests.
///
/// Implementations must guarantee that concurrent `increment_vote` calls on
/// the same id never lose an update, and that every record returned by
/// `list_all` or `get_by_id` reflects a committed state.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// Validate and persist a new record with `votes = 0`.
    ///
    /// Nothing is written when validation fails.
    async fn create(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> StoreResult<FeatureRequest> {
        let new = NewFeatureRequest::parse(title, description).map_err(StoreError::Validation)?;
        self.insert(new).await
    }

    /// Persist an already validated record.
    async fn insert(&self, new: NewFeatureRequest) -> StoreResult<FeatureRequest>;

    /// Atomically add one vote and return the post-increment record.
    async fn increment_vote(&self, id: i64) -> StoreResult<FeatureRequest>;

    async fn get_by_id(&self, id: i64) -> StoreResult<FeatureRequest>;

    /// Every record, in no particular order.
    async fn list_all(&self) -> StoreResult<Vec<FeatureRequest>>;

    /// Cheap reachability probe for readiness checks.
    async fn ping(&self) -> StoreResult<()>;

    /// Release the underlying storage. Later calls fail with
    /// [`StoreError::Transient`].
    async fn close(&self);
}
