//! Error type for history orchestration

use rewind_backup::BackupError;
use rewind_delta::DeltaError;
use thiserror::Error;

/// Errors surfaced while dispatching through the orchestrator
///
/// Both sources are fatal configuration errors; recoverable conditions
/// (nothing to undo, zero-distance rewind) are reported through
/// [`Outcome`](crate::Outcome) instead.
#[derive(Debug, Clone, Error)]
pub enum HistoryError {
    /// The backup engine rejected the codec-tree configuration
    #[error(transparent)]
    Backup(#[from] BackupError),

    /// A delta failed to apply to the present it was recorded against
    #[error(transparent)]
    Delta(#[from] DeltaError),
}
