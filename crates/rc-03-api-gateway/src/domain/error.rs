//! Gateway error types.
//!
//! `ApiError` is what a request handler returns; it renders as
//! `{"error": "..."}` with its HTTP status. `GatewayError` covers the server
//! lifecycle.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rc_01_replication::ReplicationError;
use rc_02_chat_store::StoreError;
use serde::Serialize;
use tracing::error;

/// Request-level error with the HTTP status it maps to.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(details: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, details)
    }

    /// The replication engine no longer accepts submissions.
    pub fn unavailable(details: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, details)
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {}", details.into()),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: &self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ReplicationError> for ApiError {
    fn from(e: ReplicationError) -> Self {
        match e {
            ReplicationError::IntakeClosed => ApiError::unavailable(e.to_string()),
            other => {
                error!(error = %other, "Replication engine rejected submission");
                ApiError::internal(other.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Replication(inner) => inner.into(),
            other => {
                error!(error = %other, "Chat store failure");
                ApiError::internal(other.to_string())
            }
        }
    }
}

/// Result type for request handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway-level errors (server lifecycle)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("server bind error: {0}")]
    Bind(String),

    #[error("server error: {0}")]
    Serve(String),
}
