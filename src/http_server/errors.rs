//! # API Errors
//!
//! Maps submission and storage failures onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::store::StoreError;
use crate::submission::SubmissionError;

/// Errors surfaced by the API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller sent an unusable payload
    #[error(transparent)]
    InvalidSubmission(#[from] SubmissionError),

    /// The store failed; fatal to the request
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// The blocking worker running the store call did not complete
    #[error("Store worker failed: {0}")]
    Worker(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidSubmission(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) | ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidSubmission(err) => err.code(),
            ApiError::Storage(err) => err.code(),
            ApiError::Worker(_) => "HIGHSCORES_WORKER_FAILED",
        }
    }
}

/// JSON error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server faults are logged with detail and reported generically
        let message = if status.is_server_error() {
            error!(code = self.code(), error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            debug!(code = self.code(), error = %self, "request rejected");
            self.to_string()
        };

        let body = ErrorResponse {
            error: message,
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
