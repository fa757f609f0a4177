// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug)]
pub enum PinsError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Account already exists: {0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden access")]
    Forbidden,

    #[error("Internal server error")]
    InternalError,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Uploaded file exceeds the size limit")]
    PayloadTooLarge,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Convert PinsError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for PinsError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code) = match self {
            PinsError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            PinsError::AlreadyExists(_) => (StatusCode::CONFLICT, "ALREADY_EXISTS"),
            PinsError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            PinsError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            PinsError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            PinsError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            PinsError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            PinsError::InternalError => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            PinsError::StorageError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            PinsError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            PinsError::RateLimitExceeded => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED")
            }
        };

        let body = json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PinsError::NotFound(_) => StatusCode::NOT_FOUND,
            PinsError::AlreadyExists(_) => StatusCode::CONFLICT,
            PinsError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PinsError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PinsError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PinsError::Unauthorized => StatusCode::UNAUTHORIZED,
            PinsError::Forbidden => StatusCode::FORBIDDEN,
            PinsError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            PinsError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PinsError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            PinsError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}
