// src/error.rs

//! Unified error handling for the IndexNow client.

use thiserror::Error;

/// Result type alias for IndexNow operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
///
/// Failed HTTP responses are deliberately absent: after the retry budget is
/// spent they are surfaced as [`BatchOutcome`](crate::models::BatchOutcome)
/// data, not raised as errors. Only network-level transport failures (no
/// response at all) appear here, as [`AppError::Http`].
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Empty or unparseable URL input
    #[error("Input error: {0}")]
    Input(String),

    /// URLs spanning more than one host
    #[error("Validation error: {0}")]
    Validation(String),

    /// No key resolvable from any source
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem-backed operation on a runtime without filesystem access
    #[error("Platform error: {0}")]
    Platform(String),
}

impl AppError {
    /// Create an input error.
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a platform error.
    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform(message.into())
    }
}
