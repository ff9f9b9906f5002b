//! Error types for stereoscopy-compose

use thiserror::Error;

/// Errors that can occur while composing a stereo pair
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] stereoscopy_core::Error),

    /// Invalid composition parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for composition operations
pub type ComposeResult<T> = Result<T, ComposeError>;
