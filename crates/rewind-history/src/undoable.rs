//! The undoable orchestrator
//!
//! Wraps a pure transition function with present/history/future
//! bookkeeping. The transition always runs first; the action's class then
//! decides whether to record a moment, step the present through recorded
//! deltas, resync it from the live state, or carry everything forward
//! unchanged.

use crate::action::{Action, ActionClass};
use crate::envelope::Envelope;
use crate::error::HistoryError;
use crate::history::{create_history, restore, restore_with_rewind};
use rewind_backup::{create_backup, load_backup, CodecTree};
use rewind_delta::{Delta, DeltaEngine, StructuralEngine};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct UndoableConfig {
    /// Maximum number of recorded deltas kept; the oldest are dropped
    pub history_limit: usize,
}

impl Default for UndoableConfig {
    fn default() -> Self {
        Self { history_limit: 100 }
    }
}

impl UndoableConfig {
    /// Create a configuration with a custom history limit
    pub fn new(history_limit: usize) -> Self {
        Self { history_limit }
    }
}

/// What a dispatch did, alongside the fresh envelope
///
/// A rewind past the available history and a rewind that changed nothing
/// both hand back an envelope equal to the input, so the outcome is the
/// only way to tell them apart from a real step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A moment was recorded
    Recorded,
    /// The present stepped backward or forward through recorded deltas
    Stepped,
    /// Nothing to step through (or a zero-distance rewind); unchanged
    Nothing,
    /// The present was recomputed from the live state
    Resynced,
    /// The action had no history effect; bookkeeping carried forward
    Forwarded,
}

/// Wraps a transition function with time-travel semantics
///
/// The transition receives `None` on the very first dispatch and supplies
/// its own initial state, the way a reducer does.
pub struct Undoable<T> {
    transition: T,
    tree: CodecTree,
    engine: Box<dyn DeltaEngine>,
    config: UndoableConfig,
}

impl<T> Undoable<T>
where
    T: Fn(Option<&Value>, &Action) -> Value,
{
    /// Wrap a transition function with the given codec tree
    pub fn new(transition: T, tree: CodecTree) -> Self {
        Self {
            transition,
            tree,
            engine: Box::new(StructuralEngine::new()),
            config: UndoableConfig::default(),
        }
    }

    /// Swap in an alternative delta engine
    pub fn with_engine(mut self, engine: impl DeltaEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: UndoableConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one transition and apply its history effect
    ///
    /// Pass `None` for the very first dispatch; the transition supplies
    /// the initial state and a first moment is recorded unconditionally.
    pub fn dispatch(
        &self,
        envelope: Option<&Envelope>,
        action: &Action,
    ) -> Result<(Envelope, Outcome), HistoryError> {
        let Some(previous) = envelope else {
            let state = (self.transition)(None, action);
            let env = self.record_moment(Envelope::new(state));
            return Ok((env, Outcome::Recorded));
        };

        let state = (self.transition)(Some(&previous.state), action);
        let mut env = previous.clone();
        env.state = state;

        match ActionClass::classify(&action.kind) {
            ActionClass::Moment => Ok((self.record_moment(env), Outcome::Recorded)),
            ActionClass::Undo => self.rewind(env, 1),
            ActionClass::Redo => self.rewind(env, -1),
            ActionClass::Apply => self.resync(env),
            ActionClass::Passthrough => Ok((env, Outcome::Forwarded)),
        }
    }

    /// Step the present `distance` moments backward (positive) or forward
    /// (negative)
    ///
    /// Stepping past the available deltas, or a zero distance, is a
    /// recoverable condition: the envelope comes back unchanged with
    /// [`Outcome::Nothing`].
    pub fn rewind(
        &self,
        mut env: Envelope,
        distance: isize,
    ) -> Result<(Envelope, Outcome), HistoryError> {
        if distance == 0 {
            tracing::warn!("zero-distance rewind requested");
            return Ok((env, Outcome::Nothing));
        }

        let undoing = distance > 0;
        let steps = distance.unsigned_abs();
        let available = if undoing {
            env.history.len()
        } else {
            env.future.len()
        };
        if steps > available {
            tracing::warn!(
                steps,
                available,
                "nothing to {}",
                if undoing { "undo" } else { "redo" }
            );
            return Ok((env, Outcome::Nothing));
        }
        let Some(mut present) = env.present.clone() else {
            // Non-empty history/future with no present would be a broken
            // envelope; refuse to step rather than invent one
            tracing::warn!("rewind requested before any recorded moment");
            return Ok((env, Outcome::Nothing));
        };

        let source = if undoing {
            &mut env.history
        } else {
            &mut env.future
        };
        let consumed: Vec<Delta> = source.drain(0..steps).collect();

        // Nearest delta first; each step hands back the delta that re-does it
        let mut reversals = Vec::with_capacity(consumed.len());
        for delta in &consumed {
            let (stepped, reverse) = restore_with_rewind(self.engine.as_ref(), &present, delta)?;
            present = stepped;
            reversals.push(reverse);
        }

        // Prepend in reverse accumulation order: the deepest step's inverse
        // ends up nearest, keeping the opposite list nearest-first
        let opposite = if undoing {
            &mut env.future
        } else {
            &mut env.history
        };
        for reverse in reversals {
            opposite.insert(0, reverse);
        }

        env.state = load_backup(&env.state, &self.tree, Some(&present))?;
        env.present = Some(present);

        tracing::debug!(steps, undoing, "stepped present");
        Ok((env, Outcome::Stepped))
    }

    /// Record a moment from the live state
    fn record_moment(&self, mut env: Envelope) -> Envelope {
        let new_present = create_backup(&env.state, &self.tree);

        if let Some(old_present) = env.present.take() {
            let delta = create_history(self.engine.as_ref(), &new_present, &old_present);
            env.history.insert(0, delta);
            env.history.truncate(self.config.history_limit);
        }
        // First moment: nothing to diff against, history stays empty

        env.present = Some(new_present);
        // A new branch invalidates any pending redo path
        env.future.clear();

        tracing::debug!(history = env.history.len(), "recorded moment");
        env
    }

    /// Recompute the present from the live state
    ///
    /// With history present, the most recent delta is re-expressed against
    /// the new present so undo still lands on the same prior moment. With
    /// no history there is no chain to repair; the present is replaced and
    /// both lists are cleared.
    fn resync(&self, mut env: Envelope) -> Result<(Envelope, Outcome), HistoryError> {
        let new_present = create_backup(&env.state, &self.tree);

        match (env.present.take(), env.history.first()) {
            (Some(old_present), Some(nearest)) => {
                let prior = restore(self.engine.as_ref(), &old_present, nearest)?;
                let delta = create_history(self.engine.as_ref(), &new_present, &prior);
                env.history[0] = delta;
            }
            _ => {
                env.history.clear();
            }
        }

        env.present = Some(new_present);
        // A resync invalidates any pending redo path
        env.future.clear();

        tracing::debug!("resynced present from live state");
        Ok((env, Outcome::Resynced))
    }
}
