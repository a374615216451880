use crate::config::SERVICE_NAME;
use crate::services::FeatureService;
use actix_web::{web, HttpResponse};

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME
    }))
}

/// Ready only while the store answers its probe
pub async fn readiness_check(service: web::Data<FeatureService>) -> HttpResponse {
    match service.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ready",
            "service": SERVICE_NAME
        })),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unavailable",
                "service": SERVICE_NAME,
                "error": e.to_string()
            }))
        }
    }
}
