//! The undoable envelope
//!
//! The envelope is the only long-lived value the orchestrator touches,
//! and it is always replaced wholesale: a caller holding a previous
//! envelope will never see it change underneath them.

use rewind_delta::Delta;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// State tree plus the time-travel bookkeeping around it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// The live state tree
    pub state: Value,
    /// Deltas stepping the present backward, newest first
    pub history: Vec<Delta>,
    /// Snapshot of the most recently recorded moment
    ///
    /// `None` exactly until the first moment is recorded.
    pub present: Option<Value>,
    /// Deltas stepping the present forward, most recently undone first
    pub future: Vec<Delta>,
}

impl Envelope {
    /// Wrap a state tree with empty bookkeeping
    pub fn new(state: Value) -> Self {
        Self {
            state,
            history: Vec::new(),
            present: None,
            future: Vec::new(),
        }
    }

    /// True if at least one moment can be undone
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// True if at least one undone moment can be redone
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of moments available to undo
    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    /// Number of undone moments available to redo
    pub fn future_depth(&self) -> usize {
        self.future.len()
    }
}
