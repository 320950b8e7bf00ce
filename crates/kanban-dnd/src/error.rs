//! Error Types
//!
//! Failures surfaced by the persistence seam and configuration loading.

use thiserror::Error;

/// Common result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Remote API errors. Any of these aborts an optimistic operation and
/// triggers its rollback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Non-2xx response
    #[error("Request failed with status {status}: {body}")]
    Http { status: u16, body: String },
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),
    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Not found: {0}")]
    NotFound(String),
    /// Rejected before any request was sent
    #[error("Invalid input: {0}")]
    Invalid(String),
}

impl ApiError {
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        ApiError::Http { status, body: body.into() }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}
