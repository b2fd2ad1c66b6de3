//! Conversion errors.

use thiserror::Error;

/// Errors from turning a fallback object into a row.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The object's shape has no row representation.
    #[error("unsupported fallback object: {0}")]
    Unsupported(String),
}
