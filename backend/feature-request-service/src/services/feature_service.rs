/// Entry point for the four core operations
///
/// Transport code talks to `FeatureService` only. Writes go to the store,
/// reads go through the ranking layer, and every call is timed and counted.
use crate::db::FeatureStore;
use crate::error::StoreResult;
use crate::metrics::{
    FEATURES_CREATED_TOTAL, STORE_OPERATION_DURATION_SECONDS, STORE_OPERATION_ERRORS,
    VOTES_RECORDED_TOTAL,
};
use crate::models::FeatureRequest;
use crate::services::RankingService;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct FeatureService {
    store: Arc<dyn FeatureStore>,
    ranking: RankingService,
}

impl FeatureService {
    pub fn new(store: Arc<dyn FeatureStore>) -> Self {
        let ranking = RankingService::new(Arc::clone(&store));
        Self { store, ranking }
    }

    pub async fn create(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> StoreResult<FeatureRequest> {
        let feature = observe("create", self.store.create(title, description)).await?;
        FEATURES_CREATED_TOTAL.inc();
        Ok(feature)
    }

    pub async fn vote(&self, id: i64) -> StoreResult<FeatureRequest> {
        let feature = observe("increment_vote", self.store.increment_vote(id)).await?;
        VOTES_RECORDED_TOTAL.inc();
        Ok(feature)
    }

    pub async fn list_ranked(&self) -> StoreResult<Vec<FeatureRequest>> {
        observe("list_ranked", self.ranking.list_ranked()).await
    }

    pub async fn get(&self, id: i64) -> StoreResult<FeatureRequest> {
        observe("get_by_id", self.ranking.get_ranked(id)).await
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.store.ping().await
    }
}

async fn observe<T, F>(operation: &'static str, fut: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    let start = Instant::now();
    let result = fut.await;

    STORE_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(start.elapsed().as_secs_f64());

    if let Err(err) = &result {
        STORE_OPERATION_ERRORS
            .with_label_values(&[operation, err.kind()])
            .inc();
    }

    result
}
