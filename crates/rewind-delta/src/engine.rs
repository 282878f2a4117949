//! The pluggable delta strategy
//!
//! The history engine only ever talks to this trait, so an alternative
//! implementation (structural hashing for very large states, say) can
//! replace [`StructuralEngine`](crate::StructuralEngine) without touching
//! any caller.

use crate::delta::Delta;
use crate::error::DeltaError;
use serde_json::Value;

/// Diff, patch, reverse, and clone over JSON value trees
///
/// Contract: for any values `a` and `b`,
/// `patch(a, diff(a, b)) == b` and `patch(b, reverse(diff(a, b))) == a`.
pub trait DeltaEngine {
    /// Compute the delta transforming `from` into `to`
    ///
    /// Returns the identity delta when the values are equal.
    fn diff(&self, from: &Value, to: &Value) -> Delta;

    /// Apply a delta, consuming the target and returning the patched value
    ///
    /// Fails when the target does not match what the delta recorded.
    fn patch(&self, value: Value, delta: &Delta) -> Result<Value, DeltaError>;

    /// Invert a delta so it transforms `to` back into `from`
    fn reverse(&self, delta: &Delta) -> Delta;

    /// Produce an independent, safely mutable copy of a value
    fn clone_state(&self, value: &Value) -> Value {
        value.clone()
    }
}
