use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rollstock_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds database and panic variants.
/// Implements [`IntoResponse`] so every handler shares one mapping from
/// error kind to status code and JSON body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `rollstock_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx. Any open transaction has already been
    /// rolled back by the time this reaches the handler.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An unexpected failure with a human-readable message.
    #[error("Unexpected error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InvalidState(msg) => {
                    (StatusCode::BAD_REQUEST, "INVALID_STATE", msg.clone())
                }
            },

            // --- Database errors ---
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    format!("Database error: {err}"),
                )
            }

            // --- Recovered panics ---
            AppError::InternalError(msg) => unexpected(msg),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn unexpected(msg: &str) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %msg, "Unexpected error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        format!("Unexpected error: {msg}"),
    )
}

/// Turn a handler panic into the same JSON envelope as [`AppError::InternalError`].
///
/// Installed through `CatchPanicLayer::custom` so a panicking request never
/// takes the process down.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "handler panicked".to_string()
    };
    AppError::InternalError(detail).into_response()
}
