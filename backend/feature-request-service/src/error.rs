/// Error types for feature-request-service
///
/// `StoreError` is what the store and ranking layer return. `AppError` is
/// the HTTP-facing wrapper that carries the failed operation's context and
/// renders the JSON error envelope.
use crate::models::FieldViolation;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type for HTTP handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Validation failed: {}", describe_violations(.0))]
    Validation(Vec<FieldViolation>),

    #[error("Feature with ID {0} does not exist")]
    NotFound(i64),

    /// Storage unreachable or timed out; the operation made no change and
    /// may be retried from scratch
    #[error("Storage temporarily unavailable: {0}")]
    Transient(String),

    #[error("Storage error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }

    /// Label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Validation(_) => "validation",
            StoreError::NotFound(_) => "not_found",
            StoreError::Transient(_) => "transient",
            StoreError::Internal(_) => "internal",
        }
    }
}

fn describe_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Transient(err.to_string())
            }
            sqlx::Error::Tls(_) | sqlx::Error::WorkerCrashed => {
                StoreError::Transient(err.to_string())
            }
            sqlx::Error::Database(ref db_err)
                if db_err
                    .code()
                    .is_some_and(|code| TRANSIENT_SQLSTATES.iter().any(|s| *s == code)) =>
            {
                StoreError::Transient(err.to_string())
            }
            other => StoreError::Internal(other.to_string()),
        }
    }
}

// query_canceled (statement_timeout), serialization_failure, deadlock_detected,
// cannot_connect_now
const TRANSIENT_SQLSTATES: [&str; 4] = ["57014", "40001", "40P01", "57P03"];

/// HTTP-facing error
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("Feature with ID {0} does not exist")]
    NotFound(i64),

    #[error("Service temporarily unavailable: {0}")]
    Unavailable(String),

    /// `context` names the failed operation, e.g. "Failed to record vote"
    #[error("{context}: {message}")]
    Internal {
        context: &'static str,
        message: String,
    },
}

impl AppError {
    /// Translate a store failure for the operation described by `context`
    pub fn from_store(context: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::Validation(violations) => AppError::Validation(violations),
            StoreError::NotFound(id) => AppError::NotFound(id),
            StoreError::Transient(message) => {
                tracing::warn!(error = %message, "{}: storage unavailable", context);
                AppError::Unavailable(message)
            }
            StoreError::Internal(message) => {
                tracing::error!(error = %message, "{}", context);
                AppError::Internal { context, message }
            }
        }
    }

    pub fn invalid_field(field: &str, message: &str) -> Self {
        AppError::Validation(vec![FieldViolation::new(field, message)])
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(details) => json!({
                "error": "Validation failed",
                "details": details,
            }),
            AppError::NotFound(id) => json!({
                "error": "Feature not found",
                "message": format!("Feature with ID {} does not exist", id),
            }),
            AppError::Unavailable(message) => json!({
                "error": "Service temporarily unavailable",
                "message": message,
            }),
            AppError::Internal { context, message } => json!({
                "error": context,
                "message": message,
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
