//! Core Error Types
//!
//! Errors raised by collaborators (job store, image backend, path resolution)
//! and by the job model itself. Executors never surface these to the
//! orchestrator directly; they are rendered into model-facing tool results.

use thiserror::Error;

/// Core error type for the studio workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Job store failures (read or patch)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Image generation backend failures
    #[error("Image generation error: {0}")]
    ImageGeneration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an image generation error
    pub fn image_generation(msg: impl Into<String>) -> Self {
        Self::ImageGeneration(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
