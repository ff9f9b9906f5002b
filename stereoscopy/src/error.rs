//! Error type of the stereo pipeline

use thiserror::Error;

/// Errors that can occur anywhere between reading a stereo pair and
/// writing the result
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Core library error, including mismatched pair sizes
    #[error("core error: {0}")]
    Core(#[from] stereoscopy_core::Error),

    /// Geometry error
    #[error("transform error: {0}")]
    Transform(#[from] stereoscopy_transform::TransformError),

    /// Anaglyph error
    #[error("anaglyph error: {0}")]
    Color(#[from] stereoscopy_color::ColorError),

    /// Layout error
    #[error("compose error: {0}")]
    Compose(#[from] stereoscopy_compose::ComposeError),

    /// Reading or writing failed
    #[error("{0}")]
    Io(#[from] stereoscopy_io::IoError),

    /// Inconsistent options
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
