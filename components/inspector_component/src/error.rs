//! Error types for the inspector

use capture_types::CaptureError;
use thiserror::Error;

/// Errors that can occur in inspector operations
#[derive(Error, Debug)]
pub enum InspectorError {
    /// Event pump is already running
    #[error("Inspector is already running")]
    AlreadyRunning,

    /// Event pump is not running
    #[error("Inspector is not running")]
    NotRunning,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Transport event could not be captured
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    /// Other errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for inspector operations
pub type Result<T> = std::result::Result<T, InspectorError>;
