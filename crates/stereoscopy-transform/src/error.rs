//! Error types for stereoscopy-transform

use thiserror::Error;

/// Errors that can occur during geometric transformations
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] stereoscopy_core::Error),

    /// Invalid transformation parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Singular matrix (non-invertible)
    #[error("singular transformation matrix")]
    SingularMatrix,

    /// The resolved output canvas has no area
    #[error("degenerate canvas: {width}x{height}")]
    DegenerateCanvas { width: f64, height: f64 },

    /// The alignment estimator did not converge to a usable result
    #[error("alignment estimation failed: {0}")]
    EstimatorFailed(String),

    /// A pixel or percentage length could not be parsed
    #[error("invalid length '{0}': expected pixels or a percentage such as 5%")]
    InvalidLength(String),
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
