//! Error types for the layout engine

use thiserror::Error;

/// Errors that can occur during layout computation
///
/// The engine favors graceful degradation; these cover genuinely
/// malformed input only.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// Container box is zero, negative, or non-finite
    #[error("invalid container size: {width}x{height}")]
    InvalidContainer { width: f64, height: f64 },

    /// Chart data contains NaN or infinite values
    #[error("chart data contains non-finite values")]
    NonFiniteData,
}

/// Result type for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;
