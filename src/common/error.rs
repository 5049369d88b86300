//! Error types for the smoke runner
//!
//! These cover the runner's own plumbing: configuration and transport.
//! Failures of the API under test are not errors at this level; they are
//! reported as step results (see `testing::StepFailure`).

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the smoke runner
#[derive(Error, Debug)]
pub enum Error {
    // === Transport Errors ===
    #[error("Cannot connect to server at {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Request to {url} timed out after {secs} seconds")]
    Timeout { url: String, secs: u64 },

    #[error("Invalid base URL '{0}'. Expected an http:// or https:// URL")]
    InvalidUrl(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },
}

impl Error {
    /// Create a connection error for a request URL
    pub fn connection<S: ToString>(url: &str, message: S) -> Self {
        Self::Connection {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    /// Whether this error means the server could not be reached at all
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }
}
