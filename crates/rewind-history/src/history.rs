//! Diff history over recorded snapshots
//!
//! Thin layer over the delta engine fixing the conventions the
//! orchestrator relies on: history deltas always rewind (newer snapshot in
//! first position), restores never mutate their input, and every rewind
//! step hands back the exact delta that re-does it.

use rewind_delta::{Delta, DeltaEngine, DeltaError};
use serde_json::Value;

/// Record the delta stepping `next` back to `prev`
///
/// The argument order is load-bearing: the engine's diff encodes
/// additions and removals differently depending on which side is newer,
/// and everything downstream assumes the delta rewinds.
pub fn create_history(engine: &dyn DeltaEngine, next: &Value, prev: &Value) -> Delta {
    engine.diff(next, prev)
}

/// Apply a delta to a clone of `current`
///
/// The input is never mutated; callers holding it see it unchanged.
pub fn restore(
    engine: &dyn DeltaEngine,
    current: &Value,
    delta: &Delta,
) -> Result<Value, DeltaError> {
    let clone = engine.clone_state(current);
    engine.patch(clone, delta)
}

/// Apply a delta and also return its inverse
///
/// The inverse is the exact delta that steps the restored value back to
/// `current`, so the caller never has to recompute a diff to rewind.
pub fn restore_with_rewind(
    engine: &dyn DeltaEngine,
    current: &Value,
    delta: &Delta,
) -> Result<(Value, Delta), DeltaError> {
    let restored = restore(engine, current, delta)?;
    let reverse = engine.reverse(delta);
    Ok((restored, reverse))
}

/// Lazy walk over the states an ordered delta list steps through
///
/// Yields one intermediate state per delta, cumulatively applied from the
/// starting state. An absent starting state yields nothing. States are
/// produced on demand, so consumers may stop early without materializing
/// the whole history; to restart, build a new walker from the same inputs.
pub struct Timeline<'a> {
    engine: &'a dyn DeltaEngine,
    deltas: std::slice::Iter<'a, Delta>,
    current: Option<Value>,
}

impl<'a> Timeline<'a> {
    /// Create a walker from a starting state and the deltas to apply
    pub fn new(engine: &'a dyn DeltaEngine, start: Option<Value>, deltas: &'a [Delta]) -> Self {
        Self {
            engine,
            deltas: deltas.iter(),
            current: start,
        }
    }
}

impl Iterator for Timeline<'_> {
    type Item = Result<Value, DeltaError>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        let delta = self.deltas.next()?;

        match self.engine.patch(current, delta) {
            Ok(stepped) => {
                self.current = Some(stepped.clone());
                Some(Ok(stepped))
            }
            // `current` stays empty, ending the walk after the error
            Err(err) => Some(Err(err)),
        }
    }
}
