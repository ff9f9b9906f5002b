//! Error types for stereoscopy-color

use thiserror::Error;

/// Errors that can occur during anaglyph synthesis
#[derive(Debug, Error)]
pub enum ColorError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] stereoscopy_core::Error),

    /// Unknown anaglyph method name
    #[error("unknown anaglyph method '{0}': expected gray, color, half-color, wimmer or dubois")]
    UnknownMethod(String),

    /// Unknown color scheme name
    #[error(
        "unknown color scheme '{0}': expected red-green, red-blue, red-cyan, green-magenta, amber-blue or magenta-cyan"
    )]
    UnknownColorScheme(String),

    /// Unknown luma coding name
    #[error("unknown luma coding '{0}': expected rgb, rec601 or rec709")]
    UnknownLumaCoding(String),

    /// The Dubois method has no matrices for this color scheme
    #[error("the dubois method does not support the {0} color scheme")]
    UnsupportedDuboisScheme(crate::ColorScheme),
}

/// Result type for color operations
pub type ColorResult<T> = Result<T, ColorError>;
