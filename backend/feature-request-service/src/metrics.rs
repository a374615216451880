//! Prometheus metrics for feature-request-service.
//!
//! Exposes store operation collectors and an HTTP handler for the `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder, HistogramVec,
    IntCounter, IntCounterVec, TextEncoder,
};

lazy_static! {
    /// Feature requests successfully created.
    pub static ref FEATURES_CREATED_TOTAL: IntCounter = register_int_counter!(
        "feature_requests_created_total",
        "Total feature requests created"
    )
    .expect("failed to register feature_requests_created_total");

    /// Votes successfully recorded.
    pub static ref VOTES_RECORDED_TOTAL: IntCounter = register_int_counter!(
        "feature_votes_recorded_total",
        "Total votes recorded across all feature requests"
    )
    .expect("failed to register feature_votes_recorded_total");

    /// Failed store operations by operation and error kind.
    pub static ref STORE_OPERATION_ERRORS: IntCounterVec = register_int_counter_vec!(
        "feature_store_operation_errors_total",
        "Failed feature store operations segmented by operation and error kind",
        &["operation", "kind"]
    )
    .expect("failed to register feature_store_operation_errors_total");

    /// Store operation latency.
    pub static ref STORE_OPERATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "feature_store_operation_duration_seconds",
        "Feature store operation duration segmented by operation",
        &["operation"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]
    )
    .expect("failed to register feature_store_operation_duration_seconds");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
