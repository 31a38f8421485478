// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for the card store, geocoding and detection

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Every fallible operation in the service returns this enum
/// Each variant maps to an HTTP status code and error code string
#[derive(Error, Debug)]
pub enum CardsError {
    #[error("Card not found with id: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal server error")]
    #[allow(dead_code)]
    InternalError,
}

impl CardsError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            CardsError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            CardsError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            CardsError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            CardsError::StorageError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            CardsError::ExternalApiError(_) => (StatusCode::BAD_GATEWAY, "EXTERNAL_API_ERROR"),
            CardsError::RateLimitExceeded => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED")
            }
            CardsError::InternalError => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl From<std::io::Error> for CardsError {
    fn from(e: std::io::Error) -> Self {
        CardsError::StorageError(e.to_string())
    }
}

impl From<validator::ValidationErrors> for CardsError {
    fn from(e: validator::ValidationErrors) -> Self {
        CardsError::ValidationError(e.to_string())
    }
}

/// Convert CardsError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for CardsError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code) = self.parts();

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
        self.parts().0
    }
}

/// Why a place-name lookup produced no result
/// DOCUMENTATION: Kept separate from "no card matched" so diagnostics can tell them apart,
/// even though the public matcher collapses both to None
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("reverse geocoding failed: {0}")]
    Geocoding(#[from] CardsError),

    #[error("reverse geocoding returned no places for ({latitude}, {longitude})")]
    NoPlaces { latitude: f64, longitude: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            CardsError::NotFound("x".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CardsError::StorageError("disk full".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            CardsError::RateLimitExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_io_error_becomes_storage_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: CardsError = io.into();
        assert!(matches!(err, CardsError::StorageError(_)));
    }
}
