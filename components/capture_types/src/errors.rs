// Capture error types
// Only transport-level failures surface as errors; malformed frame payloads never do

use thiserror::Error;

/// Errors raised while turning transport events into capture commands
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Event envelope is not a CDP event
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Event method is not in "Domain.event" form
    #[error("Invalid event method: {0}")]
    InvalidMethod(String),

    /// Event params do not match the event's schema
    #[error("Invalid params for {method}: {details}")]
    InvalidParams {
        /// Full event method name
        method: String,
        /// What was wrong
        details: String,
    },
}

impl CaptureError {
    /// Build an `InvalidParams` error for the given method
    pub fn invalid_params(method: impl Into<String>, details: impl ToString) -> Self {
        Self::InvalidParams {
            method: method.into(),
            details: details.to_string(),
        }
    }
}

/// Result type for capture operations
pub type Result<T> = std::result::Result<T, CaptureError>;
