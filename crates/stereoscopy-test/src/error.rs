//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur during regression testing
#[derive(Debug, Error)]
pub enum TestError {
    /// Failed to build a synthetic fixture image
    #[error("failed to build fixture '{name}': {source}")]
    Fixture {
        name: &'static str,
        source: stereoscopy_core::Error,
    },

    /// Failed to write a regression output file
    #[error("failed to write '{path}': {message}")]
    OutputWrite { path: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
