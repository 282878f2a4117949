//! Error types for delta application

use thiserror::Error;

/// Errors raised while applying a delta to a value
#[derive(Debug, Clone, Error)]
pub enum DeltaError {
    /// The target value does not match what the delta recorded
    #[error("delta does not match target value at `{path}`")]
    Mismatch {
        /// Slash-separated path to the mismatching entry (empty for the root)
        path: String,
    },

    /// A per-key delta was applied to something that is not an object
    #[error("expected an object at `{path}` while applying delta")]
    NotAnObject {
        /// Slash-separated path to the offending entry (empty for the root)
        path: String,
    },

    /// Add/remove deltas only make sense for keyed entries, never the root
    #[error("add/remove delta cannot apply at the root value")]
    RootEntryDelta,
}
