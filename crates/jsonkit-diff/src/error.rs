//! Error types for the diff crate.

/// Errors that can occur while loading a diff tree.
///
/// Annotation itself is total; only turning raw text into a
/// [`DiffNode`](crate::DiffNode) can fail.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The diff tree text was not valid JSON.
    #[error("invalid diff tree: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
