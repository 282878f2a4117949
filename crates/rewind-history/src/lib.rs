//! Diff-based history and time-travel orchestration
//!
//! This crate provides:
//! - The diff history: [`create_history`], [`restore`],
//!   [`restore_with_rewind`], and the lazy [`Timeline`] walker
//! - The undoable orchestrator: [`Undoable`] wraps a pure transition
//!   function with present/history/future bookkeeping, dispatching on
//!   action class to record moments, step backward/forward, or resync
//!
//! Envelopes are immutable values: every dispatch yields a fresh
//! [`Envelope`], never a mutation of the previous one, so callers may hold
//! old envelopes for comparison indefinitely.

pub mod action;
pub mod envelope;
pub mod error;
pub mod history;
pub mod undoable;

// Re-exports
pub use action::{Action, ActionClass, APPLY, MOMENT_MARKER, REDO, UNDO};
pub use envelope::Envelope;
pub use error::HistoryError;
pub use history::{create_history, restore, restore_with_rewind, Timeline};
pub use undoable::{Outcome, Undoable, UndoableConfig};

// The delta vocabulary is part of this crate's surface
pub use rewind_delta::{Delta, DeltaEngine, StructuralEngine};
