//! Unified API error type with Axum `IntoResponse` support.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use lv_log_tools::LogsUnavailable;

/// API error type that converts to proper HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Every source was tried and none had lines.
    #[error("not found: {}", .0.message)]
    NotFound(Box<LogsUnavailable>),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(body) => (StatusCode::NOT_FOUND, axum::Json(*body)).into_response(),
            ApiError::BadRequest(msg) => {
                let body = json!({
                    "error": msg,
                    "status": StatusCode::BAD_REQUEST.as_u16(),
                });
                (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
            }
            ApiError::Internal(details) => {
                tracing::error!(error = %details, "request failed");
                let body = json!({
                    "error": "Failed to read logs",
                    "details": details,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
        }
    }
}

impl From<lv_log_tools::LogError> for ApiError {
    fn from(e: lv_log_tools::LogError) -> Self {
        match e {
            lv_log_tools::LogError::InvalidRequest(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Convenience alias.
pub type ApiResult<T> = Result<T, ApiError>;
