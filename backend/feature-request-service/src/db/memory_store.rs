use super::FeatureStore;
use crate::error::{StoreError, StoreResult};
use crate::models::{FeatureRequest, NewFeatureRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-process store for development and tests.
///
/// Records are sharded in a `DashMap`. An increment takes the shard's write
/// guard for the whole read-modify-write, so two increments on the same id
/// are serialized while increments on other shards and all reads proceed in
/// parallel.
///
/// Ids and `created_at` stamps are handed out together, so a higher id never
/// carries an earlier timestamp. Ids are never reused.
pub struct MemoryFeatureStore {
    records: DashMap<i64, FeatureRequest>,
    sequence: Mutex<Sequence>,
    closed: AtomicBool,
}

struct Sequence {
    next_id: i64,
    last_created_at: DateTime<Utc>,
}

impl MemoryFeatureStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            sequence: Mutex::new(Sequence {
                next_id: 1,
                last_created_at: DateTime::<Utc>::MIN_UTC,
            }),
            closed: AtomicBool::new(false),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // Timestamps never go backwards, even if the wall clock does
    fn next_identity(&self) -> StoreResult<(i64, DateTime<Utc>)> {
        let mut seq = self
            .sequence
            .lock()
            .map_err(|_| StoreError::Internal("id sequence lock poisoned".to_string()))?;

        let id = seq.next_id;
        seq.next_id += 1;
        let created_at = Utc::now().max(seq.last_created_at);
        seq.last_created_at = created_at;

        Ok((id, created_at))
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Transient("feature store is closed".to_string()));
        }
        Ok(())
    }
}

impl Default for MemoryFeatureStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureStore for MemoryFeatureStore {
    async fn insert(&self, new: NewFeatureRequest) -> StoreResult<FeatureRequest> {
        self.ensure_open()?;

        let (id, created_at) = self.next_identity()?;
        let feature = FeatureRequest {
            id,
            title: new.title().to_string(),
            description: new.description().map(str::to_string),
            votes: 0,
            created_at,
        };
        self.records.insert(id, feature.clone());

        Ok(feature)
    }

    async fn increment_vote(&self, id: i64) -> StoreResult<FeatureRequest> {
        self.ensure_open()?;

        let mut entry = self.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        entry.votes = entry
            .votes
            .checked_add(1)
            .ok_or_else(|| StoreError::Internal(format!("vote counter overflow for feature {}", id)))?;

        Ok(entry.value().clone())
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<FeatureRequest> {
        self.ensure_open()?;

        self.records
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn list_all(&self) -> StoreResult<Vec<FeatureRequest>> {
        self.ensure_open()?;

        Ok(self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.ensure_open()
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_starts_at_zero_votes() {
        let store = MemoryFeatureStore::new();
        let feature = store
            .create("Add dark mode", Some("desc"))
            .await
            .unwrap();

        assert_eq!(feature.title, "Add dark mode");
        assert_eq!(feature.description.as_deref(), Some("desc"));
        assert_eq!(feature.votes, 0);
        assert_eq!(store.get_by_id(feature.id).await.unwrap(), feature);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_without_writing() {
        let store = MemoryFeatureStore::new();

        assert!(matches!(
            store.create("", Some("anything")).await,
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            store.create(&"x".repeat(256), None).await,
            Err(StoreError::Validation(_))
        ));
        assert!(store.is_empty());

        // A rejected create must not consume an id
        let first = store.create("First", None).await.unwrap();
        assert_eq!(first.id, 1);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = MemoryFeatureStore::new();
        let mut ids = HashSet::new();
        for i in 0..50 {
            let feature = store.create(&format!("Feature {}", i), None).await.unwrap();
            assert!(ids.insert(feature.id));
        }
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let store = MemoryFeatureStore::new();
        store.create("Exists", None).await.unwrap();

        assert!(matches!(
            store.increment_vote(42).await,
            Err(StoreError::NotFound(42))
        ));
        assert!(matches!(
            store.get_by_id(42).await,
            Err(StoreError::NotFound(42))
        ));
    }

    #[tokio::test]
    async fn test_increment_returns_post_increment_record() {
        let store = MemoryFeatureStore::new();
        let feature = store.create("Vote me", None).await.unwrap();

        let voted = store.increment_vote(feature.id).await.unwrap();
        assert_eq!(voted.votes, 1);
        let voted = store.increment_vote(feature.id).await.unwrap();
        assert_eq!(voted.votes, 2);
        assert_eq!(voted.created_at, feature.created_at);
        assert_eq!(voted.title, feature.title);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_increments_lose_no_updates() {
        let store = Arc::new(MemoryFeatureStore::new());
        let id = store.create("Hot feature", None).await.unwrap().id;

        let handles: Vec<_> = (0..1000)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.increment_vote(id).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.get_by_id(id).await.unwrap().votes, 1000);
    }

    #[tokio::test]
    async fn test_closed_store_fails_transiently() {
        let store = MemoryFeatureStore::new();
        let feature = store.create("Before close", None).await.unwrap();
        store.close().await;

        assert!(store.ping().await.unwrap_err().is_transient());
        assert!(store.increment_vote(feature.id).await.unwrap_err().is_transient());
        assert!(store.list_all().await.unwrap_err().is_transient());
    }
}
