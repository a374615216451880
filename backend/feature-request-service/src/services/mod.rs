/// Business logic layer
pub mod feature_service;
pub mod ranking;

pub use feature_service::FeatureService;
pub use ranking::{rank_order, RankingService};
