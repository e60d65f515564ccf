//! # HTTP Errors
//!
//! Maps record operation errors onto status codes and JSON error bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::resolution::RecordError;

/// Result type for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP API errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Body or query string could not be parsed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Error from a record operation
    #[error("{0}")]
    Record(#[from] RecordError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Record(RecordError::InvalidInput(_)) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            ApiError::Record(RecordError::NotFound(_)) => StatusCode::NOT_FOUND,

            // 409 Conflict
            ApiError::Record(RecordError::Ambiguous { .. }) => StatusCode::CONFLICT,

            // 500 Internal Server Error
            ApiError::Record(RecordError::StoreUnavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client. Store causes stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Record(RecordError::StoreUnavailable(_)) => "Store unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.public_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(event = "STORE_REQUEST_FAILED", error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
