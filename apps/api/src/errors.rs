use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::documents::validator::ValidationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Provider failures never surface here: they are folded into a fallback
/// document by the normalizer and answered with the document's own field.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid payload: field '{field}' {reason}")]
    InvalidPayload { field: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::InvalidPayload {
            field: err.field,
            reason: err.reason.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        let (status, body) = match self {
            AppError::InvalidPayload { field, .. } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "message": message,
                    "code": "INVALID_PAYLOAD",
                    "field": field,
                }),
            ),
            AppError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({ "message": message, "code": "NOT_FOUND" }),
            ),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "message": "Method Not Allowed" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
