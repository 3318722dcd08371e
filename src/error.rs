// HTTP API Error Types
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::response::ApiJson;
use crate::store::StoreError;

/// HTTP API error with appropriate status codes and client-facing messages.
///
/// Each variant maps 1:1 to one status code. `Internal` is the only catch-all;
/// its message is passed through to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 503 Service Unavailable
    #[error("API disabled")]
    Disabled,

    // 401 Unauthorized
    #[error("invalid or missing API key")]
    Unauthorized,

    // 404 Not Found
    #[error("tree not found")]
    TreeNotFound,

    // 404 Not Found
    #[error("endpoint not found")]
    EndpointNotFound,

    // 500 Internal Server Error
    #[error("{0}")]
    Internal(String),
}

/// Wire shape of every error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Disabled => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::TreeNotFound => StatusCode::NOT_FOUND,
            ApiError::EndpointNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!("tree store error: {}", err);
        ApiError::Internal(err.to_string())
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref msg) = self {
            tracing::error!("internal fault surfaced to caller: {}", msg);
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        ApiJson::with_status(self.status_code(), body).into_response()
    }
}
