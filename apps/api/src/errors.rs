use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::applications::status::TransitionError;
use crate::extraction::ExtractionError;
use crate::generation::generator::DocumentGenerationError;
use crate::llm_client::GenerationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Document(#[from] DocumentGenerationError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Extraction(ExtractionError::InputTooShort { .. }) => (
                StatusCode::BAD_REQUEST,
                "INPUT_TOO_SHORT",
                self.to_string(),
            ),
            AppError::Extraction(ExtractionError::Generation(e)) => generation_failed(e),
            AppError::Extraction(e) => {
                tracing::warn!(
                    "Extraction rejected model output: {e}; raw: {:?}",
                    e.raw_output().unwrap_or_default()
                );
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EXTRACTION_FAILED",
                    e.to_string(),
                )
            }
            AppError::Generation(e) => generation_failed(e),
            AppError::Document(e) => {
                if let DocumentGenerationError::Generation { source, .. } = e {
                    tracing::error!("Document generation failed: {}", source.diagnostics());
                } else {
                    tracing::error!("Document generation failed: {e}");
                }
                (StatusCode::BAD_GATEWAY, "DOCUMENT_GENERATION_FAILED", e.to_string())
            }
            AppError::Transition(e @ TransitionError::InvalidTransition { .. }) => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", e.to_string())
            }
            AppError::Transition(e @ TransitionError::UnknownStatus(_)) => {
                tracing::error!("Stored application has an unreadable status: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
            AppError::S3(msg) => {
                tracing::error!("S3 error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "S3_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
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

fn generation_failed(e: &GenerationError) -> (StatusCode, &'static str, String) {
    tracing::error!("Generation failed: {}", e.diagnostics());
    (StatusCode::BAD_GATEWAY, "GENERATION_FAILED", e.to_string())
}
