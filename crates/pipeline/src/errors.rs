//! Error types for the prediction pipeline

use thiserror::Error;

/// Errors that can occur in the prediction pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input failed normalization or encoding
    #[error("input validation failed: {0}")]
    Validation(String),

    /// Model scoring or another internal step failed
    #[error("prediction processing failed: {0}")]
    Processing(String),

    /// Model artifact is structurally invalid
    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Whether this error was caused by the caller's input rather than
    /// by the service itself.
    pub fn is_validation(&self) -> bool {
        matches!(self, PipelineError::Validation(_))
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
