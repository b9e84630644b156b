//! Error types for search operations

use crate::error::AppError;

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while compiling, executing or shaping a search
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// No primary search value was supplied
    #[error("Expected query to have a 'value' term")]
    MissingPrimaryTerm,

    /// A category value outside its allow-list
    #[error("Invalid value '{value}' for category '{category}'")]
    InvalidCategoryValue { category: String, value: String },

    /// The search engine call failed or returned malformed data
    #[error("Search engine request failed: {message}")]
    TransportFailure {
        message: String,
        status: Option<u16>,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Any other internal fault
    #[error("Unexpected failure: {0}")]
    UnexpectedFailure(String),
}

impl SearchError {
    pub fn transport(message: impl Into<String>) -> Self {
        SearchError::TransportFailure {
            message: message.into(),
            status: None,
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::transport(format!("Malformed search engine response: {}", err))
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::MissingPrimaryTerm => AppError::MissingPrimaryTerm(err.to_string()),
            SearchError::InvalidCategoryValue { .. } => AppError::InvalidCategoryValue(err.to_string()),
            SearchError::TransportFailure { .. } => AppError::TransportFailure(err.to_string()),
            SearchError::InvalidConfiguration(msg) => AppError::Configuration(msg),
            SearchError::UnexpectedFailure(msg) => AppError::Internal(msg),
        }
    }
}
