// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Each variant maps to an HTTP status code and a JSON error body
#[derive(Error, Debug)]
pub enum TravelError {
    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Unauthorized")]
    Forbidden,

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Email error: {0}")]
    EmailError(String),

    #[error("Dataset error: {0}")]
    DatasetError(String),

    #[error("Too many requests, please try again later")]
    RateLimitExceeded,
}

impl TravelError {
    fn code(&self) -> &'static str {
        match self {
            TravelError::NotFound(_) => "NOT_FOUND",
            TravelError::DatabaseError(_) => "DATABASE_ERROR",
            TravelError::InvalidInput(_) => "INVALID_INPUT",
            TravelError::ValidationError(_) => "VALIDATION_ERROR",
            TravelError::Unauthorized(_) => "UNAUTHORIZED",
            TravelError::Forbidden => "FORBIDDEN",
            TravelError::InternalError(_) => "INTERNAL_ERROR",
            TravelError::EmailError(_) => "EMAIL_ERROR",
            TravelError::DatasetError(_) => "DATASET_ERROR",
            TravelError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
        }
    }
}

/// Convert TravelError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for TravelError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            TravelError::NotFound(_) => StatusCode::NOT_FOUND,
            TravelError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TravelError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            TravelError::ValidationError(_) => StatusCode::BAD_REQUEST,
            TravelError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            TravelError::Forbidden => StatusCode::FORBIDDEN,
            TravelError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TravelError::EmailError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TravelError::DatasetError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TravelError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl From<validator::ValidationErrors> for TravelError {
    fn from(errors: validator::ValidationErrors) -> Self {
        TravelError::ValidationError(errors.to_string())
    }
}
