use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use doclift_core::error::CoreError;
use serde_json::json;

use crate::storage::ArtifactError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds variants for the job
/// store, the artifact store, and request validation. Implements
/// [`IntoResponse`] so every failure leaves the API as the same
/// `{error, code}` JSON shape.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `doclift_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An artifact storage error.
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// The submitted file type is not accepted.
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Persistence errors ---
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Artifact(err) => classify_artifact_error(err),

            // --- HTTP-specific errors ---
            AppError::UnsupportedType(msg) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_TYPE", msg.clone())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Everything else means the job store cannot be read or written and
///   maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Job store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_UNAVAILABLE",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Classify an artifact storage error.
///
/// A missing artifact is a 404; any other disk failure is a sanitized 500.
fn classify_artifact_error(err: &ArtifactError) -> (StatusCode, &'static str, String) {
    match err {
        ArtifactError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Result artifact not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Artifact store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_FAILURE",
                "An internal error occurred".to_string(),
            )
        }
    }
}
