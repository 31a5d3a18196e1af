//! Error types for multimcp
//!
//! This module defines all error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for multimcp operations
///
/// Network and backend failures are normalized so that their `Display`
/// output is the user-facing failure reason shown in notifications and
/// recorded in the conversation log.
#[derive(Error, Debug)]
pub enum MultiMcpError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend answered with a non-success status
    ///
    /// Displays the backend-supplied `detail` verbatim.
    #[error("{detail}")]
    Backend {
        /// HTTP status code returned by the backend
        status: u16,
        /// Reason reported by the backend (or a per-operation fallback)
        detail: String,
    },

    /// The request never completed (connection refused, DNS, reset, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the configured client-side timeout
    #[error("Request timed out after {seconds}s")]
    Timeout {
        /// Configured timeout in seconds
        seconds: u64,
    },

    /// The backend answered 2xx but the body did not match the contract
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    /// Local history storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// User input rejected before reaching the backend
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for multimcp operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
