//! Error types for explanation requests

use thiserror::Error;

/// The only failure text shown to the user for an explanation request
pub const REQUEST_FAILED: &str = "Failed to get an explanation from Claude.";

/// Errors that can occur when requesting an explanation
#[derive(Debug, Error)]
pub enum ExplainError {
    /// API key environment variable is missing or empty
    #[error("API key not configured. Set the {var} environment variable")]
    ApiKeyNotFound {
        /// Name of the variable that was read
        var: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Rate limited by the API
    #[error("Rate limited. Retry after {retry_after_seconds} seconds")]
    RateLimited {
        /// Seconds the API asked us to wait
        retry_after_seconds: u64,
    },

    /// The API reported an error mid-stream
    #[error("Stream error: {0}")]
    StreamError(String),
}

impl ExplainError {
    /// Short text for the explanation pane; the cause goes to the log only
    pub fn user_message(&self) -> &'static str {
        REQUEST_FAILED
    }

    /// Whether the failure is about credentials
    pub fn requires_reauth(&self) -> bool {
        matches!(self, ExplainError::ApiKeyNotFound { .. } | ExplainError::ApiError { status: 401, .. })
    }
}
