//! Error types for newsdesk-api
//!
//! Every error response carries a machine-readable code and a human-readable
//! message; internal detail is logged server-side, never exposed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or missing request fields (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity absent (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transition target already satisfied (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Content approval already granted (409)
    #[error("Already approved: {0}")]
    AlreadyApproved(String),

    /// Invariant violation detected defensively - signals a bug upstream (500)
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// Upstream aggregator failure (502)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Storage layer failure (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// newsdesk-common error
    #[error("Common error: {0}")]
    Common(#[from] newsdesk_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::AlreadyApproved(msg) => (StatusCode::CONFLICT, "ALREADY_APPROVED", msg),
            ApiError::DataIntegrity(msg) => {
                // Upstream invariant violation; must be visible in the logs
                tracing::error!("Data integrity violation: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "DATA_INTEGRITY", msg)
            }
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg),
            ApiError::Database(ref err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Internal database error".to_string(),
                )
            }
            ApiError::Io(ref err) => {
                tracing::error!("IO error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IO_ERROR",
                    "Internal IO error".to_string(),
                )
            }
            ApiError::Other(ref err) => {
                tracing::error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
            ApiError::Common(ref err) => {
                tracing::error!("Internal error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
