use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::tags::VocabularyError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Stored data disagrees with the tag vocabulary or its own invariants.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<VocabularyError> for AppError {
    fn from(err: VocabularyError) -> Self {
        match err {
            VocabularyError::UnknownCategory(_) => AppError::Validation(err.to_string()),
            other => AppError::DataIntegrity(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::DataIntegrity(msg) => {
                tracing::error!("Data integrity error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATA_INTEGRITY_ERROR",
                    "Stored data is inconsistent with the tag vocabulary".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
