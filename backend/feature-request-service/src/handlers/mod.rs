/// HTTP handlers for feature-request endpoints
///
/// Handlers parse and pre-validate input, call one `FeatureService`
/// operation, and translate the result into a JSON envelope.
pub mod features;
pub mod health;

pub use features::{configure_routes, create_feature, get_feature, list_features, vote_feature};
pub use health::{health_check, readiness_check};

use actix_web::web;

/// Mount every route the service exposes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check))
        .route("/metrics", web::get().to(crate::metrics::serve_metrics))
        .configure(configure_routes);
}
