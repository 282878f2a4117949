//! Error types for the backup engine
//!
//! All three variants signal a broken codec-tree configuration. Continuing
//! past any of them would silently produce wrong state, so they abort the
//! restore instead of degrading.

use thiserror::Error;

/// Fatal configuration errors raised while restoring a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackupError {
    /// Two or more codecs pull each other through the dependency loader
    #[error("circular codec dependency: {}", .cycle.join(" -> "))]
    CircularDependency {
        /// The complete cycle, ending on the key that closed it
        cycle: Vec<String>,
    },

    /// A slice was loaded twice within one restore call
    ///
    /// The at-most-once guard makes this unreachable; seeing it means the
    /// loader's own invariants are broken.
    #[error("codec slice `{key}` was loaded twice within one restore")]
    DoubleLoad { key: String },

    /// A codec pulled a sibling key the codec tree does not declare
    #[error("codec slice `{key}` is not declared in the codec tree")]
    UndeclaredKey { key: String },
}
