use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Request carried no usable primary search value
    #[error("{0}")]
    MissingPrimaryTerm(String),

    /// Category value outside its allow-list
    #[error("{0}")]
    InvalidCategoryValue(String),

    /// Other request validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Search engine call failed or returned malformed data
    #[error("{0}")]
    TransportFailure(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingPrimaryTerm(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCategoryValue(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::TransportFailure(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::MissingPrimaryTerm(_) => "MISSING_PRIMARY_TERM",
            AppError::InvalidCategoryValue(_) => "INVALID_CATEGORY_VALUE",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::TransportFailure(_) => "TRANSPORT_FAILURE",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "UNEXPECTED_FAILURE",
        }
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        tracing::error!(
            error_code = error_code,
            status_code = status.as_u16(),
            message = %message,
            "Request error"
        );

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
