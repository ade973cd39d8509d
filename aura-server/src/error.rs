//! Error types for aura-server.

use aura_analysis::RequestError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Errors surfaced to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Invalid request: {0}")]
    InvalidBody(String),
}

/// Error payload inside the response envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Request(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Request(e) => e.code(),
            ApiError::InvalidBody(_) => "INVALID_REQUEST",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(code = self.code(), error = %self, "Rejecting request");

        let body = serde_json::json!({
            "success": false,
            "error": ErrorBody {
                code: self.code().to_string(),
                message: self.to_string(),
            }
        });

        (self.status(), axum::Json(body)).into_response()
    }
}
