//! Error types for query string conversion.

use thiserror::Error;

/// Errors that can occur while converting JSON to a query string.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// Only JSON objects map onto a query string.
    #[error("expected a JSON object, got {found}")]
    NotAnObject { found: &'static str },
}

/// Convenience type alias for params operations.
pub type Result<T> = std::result::Result<T, ParamsError>;
