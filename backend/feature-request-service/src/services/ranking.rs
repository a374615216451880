/// Ranking and lookup over the store's current snapshot
use crate::db::FeatureStore;
use crate::error::StoreResult;
use crate::models::FeatureRequest;
use std::cmp::Ordering;
use std::sync::Arc;

/// Popularity order: most votes first, then newest, then highest id.
///
/// Ids are unique, so no two distinct records compare equal.
pub fn rank_order(a: &FeatureRequest, b: &FeatureRequest) -> Ordering {
    b.votes
        .cmp(&a.votes)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// Read-only view producing the externally visible ordering
#[derive(Clone)]
pub struct RankingService {
    store: Arc<dyn FeatureStore>,
}

impl RankingService {
    pub fn new(store: Arc<dyn FeatureStore>) -> Self {
        Self { store }
    }

    /// All feature requests in [`rank_order`]
    pub async fn list_ranked(&self) -> StoreResult<Vec<FeatureRequest>> {
        let mut features = self.store.list_all().await?;
        features.sort_unstable_by(rank_order);
        Ok(features)
    }

    pub async fn get_ranked(&self, id: i64) -> StoreResult<FeatureRequest> {
        self.store.get_by_id(id).await
    }
}
