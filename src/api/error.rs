//! API error types and conversions

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::EngineError;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
///
/// Registration outcomes and validation failures are not errors; they are
/// answered with `{"Ok": false, ...}` bodies.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found
    NotFound(String),

    /// The engine is not running
    Unavailable(String),

    /// Internal server error
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::RegistryStopped | EngineError::StateStopped => {
                ApiError::Unavailable(err.to_string())
            }
            EngineError::EmptyQueue(_) | EngineError::Client(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("Error generating response body: {err}"))
    }
}
