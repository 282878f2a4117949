//! Actions and their classification
//!
//! Actions are tagged values handed to the transition function. The
//! orchestrator never inspects payloads; everything it does is driven by
//! the tag string.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Substring marking an action as moment-recording
///
/// This is a string convention, not a structural one: any tag containing
/// the marker records a moment, so an unrelated tag that happens to embed
/// it will record moments too. Pick tags accordingly.
pub const MOMENT_MARKER: &str = "@moment";

/// Exact tag: step the present one moment backward
pub const UNDO: &str = "@undo";

/// Exact tag: step the present one moment forward
pub const REDO: &str = "@redo";

/// Exact tag: recompute the present from the live state
pub const APPLY: &str = "@apply";

/// A tagged action driving one transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// The tag the orchestrator classifies on
    pub kind: String,
    /// Opaque payload for the transition function
    #[serde(default)]
    pub payload: Value,
}

impl Action {
    /// Create an action with no payload
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Value::Null,
        }
    }

    /// Create an action carrying a payload
    pub fn with_payload(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

/// What the orchestrator does with an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionClass {
    /// Record a moment after the transition runs
    Moment,
    /// Step the present one moment backward
    Undo,
    /// Step the present one moment forward
    Redo,
    /// Recompute the present from the live state
    Apply,
    /// No history effect; everything carries forward unchanged
    Passthrough,
}

impl ActionClass {
    /// Classify an action tag
    ///
    /// Control tags match exactly; the moment marker matches as a
    /// substring anywhere in the tag.
    pub fn classify(kind: &str) -> Self {
        match kind {
            UNDO => ActionClass::Undo,
            REDO => ActionClass::Redo,
            APPLY => ActionClass::Apply,
            _ if kind.contains(MOMENT_MARKER) => ActionClass::Moment,
            _ => ActionClass::Passthrough,
        }
    }
}
