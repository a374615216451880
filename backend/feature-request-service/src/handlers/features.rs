/// Feature request handlers - HTTP endpoints over the core operations
use crate::error::{AppError, Result};
use crate::models::{violations_from, CreateFeatureRequest};
use crate::services::FeatureService;
use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};
use serde::Serialize;
use validator::Validate;

pub const INVALID_ID_MSG: &str = "Feature ID must be a positive integer";

/// Success envelope shared by every feature endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T: Serialize> ApiResponse<T> {
    fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
            count: None,
        }
    }

    fn with_message(message: &'static str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message),
            data,
            count: None,
        }
    }
}

/// Ids must be integers >= 1 before they reach the store
pub fn parse_feature_id(raw: &str) -> Result<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::invalid_field("id", INVALID_ID_MSG)),
    }
}

/// List all feature requests, most popular first
pub async fn list_features(service: web::Data<FeatureService>) -> Result<HttpResponse> {
    let features = service
        .list_ranked()
        .await
        .map_err(|e| AppError::from_store("Failed to fetch features", e))?;

    let count = features.len();
    Ok(HttpResponse::Ok().json(ApiResponse {
        count: Some(count),
        ..ApiResponse::data(features)
    }))
}

/// Create a new feature request
pub async fn create_feature(
    service: web::Data<FeatureService>,
    payload: web::Json<CreateFeatureRequest>,
) -> Result<HttpResponse> {
    let req = payload.into_inner().normalized();
    req.validate()
        .map_err(|e| AppError::Validation(violations_from(&e)))?;

    let feature = service
        .create(&req.title, req.description.as_deref())
        .await
        .map_err(|e| AppError::from_store("Failed to create feature", e))?;

    tracing::info!(feature_id = feature.id, "Feature request created");

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        "Feature created successfully",
        feature,
    )))
}

/// Get a feature request by ID
pub async fn get_feature(
    service: web::Data<FeatureService>,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_feature_id(&id)?;

    let feature = service
        .get(id)
        .await
        .map_err(|e| AppError::from_store("Failed to fetch feature", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(feature)))
}

/// Record one upvote
pub async fn vote_feature(
    service: web::Data<FeatureService>,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_feature_id(&id)?;

    let feature = service
        .vote(id)
        .await
        .map_err(|e| AppError::from_store("Failed to record vote", e))?;

    tracing::debug!(feature_id = feature.id, votes = feature.votes, "Vote recorded");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        "Vote recorded successfully",
        feature,
    )))
}

/// Malformed JSON bodies get the same envelope as field violations
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::invalid_field("body", &err.to_string()).into()
}

/// Configure feature routes
///
/// The collection answers with and without a trailing slash.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/features")
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route("", web::get().to(list_features))
            .route("", web::post().to(create_feature))
            .route("/", web::get().to(list_features))
            .route("/", web::post().to(create_feature))
            .route("/{id}", web::get().to(get_feature))
            .route("/{id}/vote", web::post().to(vote_feature)),
    );
}
