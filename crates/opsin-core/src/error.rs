//! Error types for the transform stage

use thiserror::Error;

/// Result type for transform operations
pub type OpsinResult<T> = Result<T, OpsinError>;

/// Errors surfaced by the transform orchestration layer.
///
/// Kernels themselves are pure numeric functions and never fail;
/// contract violations (mismatched dimensions, missing scratch
/// storage) panic instead of returning one of these, since they are
/// caller programming errors rather than runtime conditions.
#[derive(Error, Debug)]
pub enum OpsinError {
    #[error("unsupported color conversion: {0}")]
    UnsupportedConversion(String),

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
