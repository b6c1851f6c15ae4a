//! Error types for the record sync pipeline
//!
//! This module defines all error types used throughout the workspace.

use thiserror::Error;

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the sync pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (invalid value)
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more mandatory configuration values are absent
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),

    /// Record source errors (DNS-management API)
    #[error("Record source error: {0}")]
    RecordSource(String),

    /// Sheet API errors
    #[error("Sheet error: {0}")]
    Sheet(String),

    /// Audit sink errors
    #[error("Audit error: {0}")]
    Audit(String),

    /// Two existing sheet rows carry the same name value
    #[error("Duplicate sheet rows for name '{name}': {first_id}, {second_id}")]
    DuplicateRow {
        /// The shared name value
        name: String,
        /// Row id seen first
        first_id: String,
        /// Row id seen second
        second_id: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Remote API answered with an application-level error code
    #[error("API error ({service}): code {code}: {message}")]
    Api {
        /// Service name
        service: String,
        /// Application error code
        code: i64,
        /// Error message returned by the service
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a record source error
    pub fn record_source(msg: impl Into<String>) -> Self {
        Self::RecordSource(msg.into())
    }

    /// Create a sheet error
    pub fn sheet(msg: impl Into<String>) -> Self {
        Self::Sheet(msg.into())
    }

    /// Create an audit error
    pub fn audit(msg: impl Into<String>) -> Self {
        Self::Audit(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an application-level API error
    pub fn api(service: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
        Self::Api {
            service: service.into(),
            code,
            message: message.into(),
        }
    }

    /// Map a non-success HTTP status to the matching error variant
    ///
    /// Integration crates share this so that 401/403, 404, 429 and 5xx
    /// surface the same way regardless of which API answered.
    pub fn from_status(service: &str, status: u16, context: &str, body: &str) -> Self {
        match status {
            401 | 403 => Self::auth(format!(
                "{service}: invalid credentials or insufficient permissions (status {status})"
            )),
            404 => Self::not_found(format!("{service}: {context}")),
            429 => Self::rate_limited(format!("{service}: status {status}")),
            500..=599 => Self::http(format!(
                "{service} server error: {status} - {body}"
            )),
            _ => Self::http(format!("{service}: {context} failed: {status} - {body}")),
        }
    }

    /// Whether this error should stop the binary with the configuration exit code
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::MissingConfig(_))
    }
}
