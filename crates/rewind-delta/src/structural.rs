//! Default delta engine: recursive per-key object diffs
//!
//! Objects are compared key by key so unchanged siblings never appear in
//! the delta. Everything else (scalars, arrays, type changes) is replaced
//! wholesale, which keeps every delta exactly invertible without index
//! bookkeeping.

use crate::delta::Delta;
use crate::engine::DeltaEngine;
use crate::error::DeltaError;
use serde_json::Value;
use std::collections::BTreeMap;

/// The default [`DeltaEngine`] implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralEngine;

impl StructuralEngine {
    /// Create a new structural engine
    pub fn new() -> Self {
        Self
    }
}

impl DeltaEngine for StructuralEngine {
    fn diff(&self, from: &Value, to: &Value) -> Delta {
        if from == to {
            return Delta::empty();
        }

        match (from, to) {
            (Value::Object(old), Value::Object(new)) => {
                let mut entries = BTreeMap::new();

                for (key, old_value) in old {
                    match new.get(key) {
                        Some(new_value) => {
                            let entry = self.diff(old_value, new_value);
                            if !entry.is_empty() {
                                entries.insert(key.clone(), entry);
                            }
                        }
                        None => {
                            entries.insert(key.clone(), Delta::Remove(old_value.clone()));
                        }
                    }
                }

                for (key, new_value) in new {
                    if !old.contains_key(key) {
                        entries.insert(key.clone(), Delta::Add(new_value.clone()));
                    }
                }

                Delta::Object(entries)
            }
            _ => Delta::Replace(from.clone(), to.clone()),
        }
    }

    fn patch(&self, value: Value, delta: &Delta) -> Result<Value, DeltaError> {
        let mut path = Vec::new();
        apply_value(value, delta, &mut path)
    }

    fn reverse(&self, delta: &Delta) -> Delta {
        match delta {
            Delta::Add(new) => Delta::Remove(new.clone()),
            Delta::Remove(old) => Delta::Add(old.clone()),
            Delta::Replace(old, new) => Delta::Replace(new.clone(), old.clone()),
            Delta::Object(entries) => Delta::Object(
                entries
                    .iter()
                    .map(|(key, entry)| (key.clone(), self.reverse(entry)))
                    .collect(),
            ),
        }
    }
}

/// Apply a delta at the current path, consuming the target value
fn apply_value<'a>(
    value: Value,
    delta: &'a Delta,
    path: &mut Vec<&'a str>,
) -> Result<Value, DeltaError> {
    match delta {
        Delta::Replace(old, new) => {
            if value != *old {
                return Err(DeltaError::Mismatch { path: path.join("/") });
            }
            Ok(new.clone())
        }
        Delta::Object(entries) => {
            if entries.is_empty() {
                return Ok(value);
            }
            let Value::Object(mut map) = value else {
                return Err(DeltaError::NotAnObject { path: path.join("/") });
            };

            for (key, entry) in entries {
                path.push(key);
                match entry {
                    Delta::Add(new) => {
                        // The delta recorded this key as absent
                        if map.insert(key.clone(), new.clone()).is_some() {
                            return Err(DeltaError::Mismatch { path: path.join("/") });
                        }
                    }
                    Delta::Remove(old) => match map.remove(key.as_str()) {
                        Some(found) if found == *old => {}
                        _ => return Err(DeltaError::Mismatch { path: path.join("/") }),
                    },
                    Delta::Replace(..) | Delta::Object(..) => {
                        let Some(found) = map.remove(key.as_str()) else {
                            return Err(DeltaError::Mismatch { path: path.join("/") });
                        };
                        let patched = apply_value(found, entry, path)?;
                        map.insert(key.clone(), patched);
                    }
                }
                path.pop();
            }

            Ok(Value::Object(map))
        }
        // Add/remove describe keyed entries; reaching one here means the
        // delta was aimed at a whole value
        Delta::Add(_) | Delta::Remove(_) => Err(DeltaError::RootEntryDelta),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine() -> StructuralEngine {
        StructuralEngine::new()
    }

    #[test]
    fn test_diff_equal_values_is_identity() {
        let value = json!({"a": 1, "b": {"c": [1, 2]}});
        assert!(engine().diff(&value, &value).is_empty());
    }

    #[test]
    fn test_scalar_change_round_trips() {
        let from = json!("before");
        let to = json!("after");

        let delta = engine().diff(&from, &to);
        assert_eq!(engine().patch(from.clone(), &delta).unwrap(), to);

        let reversed = engine().reverse(&delta);
        assert_eq!(engine().patch(to, &reversed).unwrap(), from);
    }

    #[test]
    fn test_nested_object_round_trips() {
        let from = json!({"keep": 1, "change": {"x": "a"}, "drop": true});
        let to = json!({"keep": 1, "change": {"x": "b"}, "added": [1, 2]});

        let delta = engine().diff(&from, &to);
        assert_eq!(engine().patch(from.clone(), &delta).unwrap(), to);

        let reversed = engine().reverse(&delta);
        assert_eq!(engine().patch(to, &reversed).unwrap(), from);
    }

    #[test]
    fn test_unchanged_siblings_not_recorded() {
        let from = json!({"keep": {"big": [1, 2, 3]}, "change": 1});
        let to = json!({"keep": {"big": [1, 2, 3]}, "change": 2});

        let delta = engine().diff(&from, &to);
        let Delta::Object(entries) = &delta else {
            panic!("object diff expected");
        };
        assert_eq!(entries.len(), 1);
        assert!(entries.contains_key("change"));
    }

    #[test]
    fn test_arrays_replaced_wholesale() {
        let from = json!({"list": [1, 2, 3]});
        let to = json!({"list": [1, 2, 3, 4]});

        let delta = engine().diff(&from, &to);
        let Delta::Object(entries) = &delta else {
            panic!("object diff expected");
        };
        assert!(matches!(entries["list"], Delta::Replace(..)));
        assert_eq!(engine().patch(from, &delta).unwrap(), to);
    }

    #[test]
    fn test_reverse_is_an_involution() {
        let from = json!({"a": 1, "b": {"c": true}});
        let to = json!({"b": {"c": false}, "d": "new"});

        let delta = engine().diff(&from, &to);
        assert_eq!(engine().reverse(&engine().reverse(&delta)), delta);
    }

    #[test]
    fn test_patch_rejects_mismatched_target() {
        let from = json!({"a": 1});
        let to = json!({"a": 2});
        let delta = engine().diff(&from, &to);

        let err = engine().patch(json!({"a": 99}), &delta).unwrap_err();
        match err {
            DeltaError::Mismatch { path } => assert_eq!(path, "a"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_patch_rejects_add_over_existing_key() {
        let delta = engine().diff(&json!({}), &json!({"a": 1}));
        assert!(engine().patch(json!({"a": 0}), &delta).is_err());
    }

    #[test]
    fn test_patch_rejects_missing_nested_key() {
        let delta = engine().diff(&json!({"a": {"b": 1}}), &json!({"a": {"b": 2}}));
        let err = engine().patch(json!({}), &delta).unwrap_err();
        match err {
            DeltaError::Mismatch { path } => assert_eq!(path, "a"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_patch_reports_nested_paths() {
        let delta = engine().diff(&json!({"a": {"b": 1}}), &json!({"a": {"b": 2}}));
        let err = engine()
            .patch(json!({"a": {"b": 99}}), &delta)
            .unwrap_err();
        match err {
            DeltaError::Mismatch { path } => assert_eq!(path, "a/b"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_clone_state_is_independent() {
        let original = json!({"nested": {"list": [1, 2, 3]}});
        let mut copy = engine().clone_state(&original);
        copy["nested"]["list"][0] = json!(99);

        assert_eq!(original["nested"]["list"][0], json!(1));
    }
}
