//! The delta encoding
//!
//! A [`Delta`] is an explicit tagged tree describing how to turn one JSON
//! value into another. Every variant carries enough of the old value to be
//! reversed exactly, so a recorded step can always be walked back without
//! recomputing a diff.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Difference between two JSON values
///
/// Scalars and arrays are treated as atomic: a change replaces the whole
/// value. Objects decompose into per-key entry deltas, so sibling keys that
/// did not change cost nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Delta {
    /// Entry absent before, present after
    Add(Value),
    /// Entry changed from the first value to the second
    Replace(Value, Value),
    /// Entry present before, absent after
    Remove(Value),
    /// Per-key deltas for an object value
    Object(BTreeMap<String, Delta>),
}

impl Delta {
    /// The identity delta: applying it changes nothing
    pub fn empty() -> Self {
        Delta::Object(BTreeMap::new())
    }

    /// True if applying this delta would change nothing
    pub fn is_empty(&self) -> bool {
        match self {
            Delta::Object(entries) => entries.is_empty(),
            _ => false,
        }
    }
}

impl Default for Delta {
    fn default() -> Self {
        Self::empty()
    }
}
