//! Error types for the docdex engine
//!
//! Absence (a key or term that is not indexed) is never an error; those
//! lookups return `Option`. The only failure the engine can surface is
//! a broken internal invariant, which always indicates a bug in the
//! engine itself; an internal id that no longer resolves is the same
//! class of failure.

use thiserror::Error;

/// Engine failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The index's cross-map consistency invariant does not hold.
    ///
    /// Raised by the explicit invariant checker and by any operation
    /// that fails to resolve an internal id it just read from a sibling
    /// map. Not recoverable; the index must be rebuilt.
    #[error("search index invariant violated: {detail}")]
    InvariantViolation {
        /// What was found to be inconsistent.
        detail: String,
    },
}

impl EngineError {
    /// Build an [`EngineError::InvariantViolation`].
    pub fn invariant(detail: impl Into<String>) -> Self {
        EngineError::InvariantViolation {
            detail: detail.into(),
        }
    }
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
