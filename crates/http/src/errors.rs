//! Recoverable errors of the Bitstamp HTTP layer
//!
//! Malformed literal URLs handed to the configuration are programming errors
//! and panic at construction time instead (see [`crate::config::url_domain`]).
//! Everything a caller can reasonably handle is an [`HttpError`].

use thiserror::Error;

/// Result type for HTTP client operations
pub type Result<T> = std::result::Result<T, HttpError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP error {0}: {1}")]
    HttpStatus(u16, String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timed out after {0}ms")]
    Timeout(u128),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl HttpError {
    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::NetworkError(_) | Self::Timeout(_) => true,
            Self::HttpStatus(status, _) => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<url::ParseError> for HttpError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
