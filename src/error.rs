//! Centralized error handling module
//!
//! The analysis engine itself never fails; these errors only arise at the
//! service edge, when decoding requests or looking up state that does not
//! exist yet.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::error::Category;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Service-edge error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Well-formed input with the wrong shape
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Input that could not be parsed at all
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, &str) {
        match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        match e.classify() {
            Category::Data => AppError::ValidationError(format!("Unreadable sensor snapshot: {}", e)),
            Category::Syntax | Category::Eof | Category::Io => {
                AppError::BadRequest(format!("Malformed JSON: {}", e))
            }
        }
    }
}

/// JSON body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Unique correlation ID for tracing
    pub correlation_id: String,
    pub error_type: String,
    /// Human-readable error message (safe for clients)
    pub message: String,
    pub status_code: u16,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str, status_code: StatusCode) -> Self {
        Self {
            correlation_id: Uuid::new_v4().to_string(),
            error_type: error_type.to_string(),
            message: message.to_string(),
            status_code: status_code.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_type, message) = self.parts();
        let body = ErrorResponse::new(error_type, message, status);

        warn!(
            correlation_id = %body.correlation_id,
            error_type = error_type,
            status_code = status.as_u16(),
            "Request rejected"
        );

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        self.parts().0
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;
