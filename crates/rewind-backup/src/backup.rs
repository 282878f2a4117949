//! Snapshot creation and dependency-resolving restore
//!
//! `create_backup` walks the codec tree in declaration order and asks each
//! codec to save its slice. `load_backup` walks the same tree but must
//! tolerate codecs that need *sibling* values regardless of declared
//! order: every slice is loaded lazily, at most once, through a per-call
//! [`DependencyLoader`] that detects cycles and reports them whole.

use crate::codec::{CodecNode, CodecTree};
use crate::error::BackupError;
use ahash::AHashMap;
use serde_json::{Map, Value};
use smallvec::SmallVec;

/// Project `state` into the snapshot declared by `tree`
///
/// Iterates the tree's own keys in declaration order; state keys the tree
/// does not declare are silently omitted, making the result a strict
/// projection. A codec saving `None` is recorded as JSON null.
pub fn create_backup(state: &Value, tree: &CodecTree) -> Value {
    let mut snapshot = Map::new();

    for (key, node) in tree.entries() {
        match node {
            CodecNode::Codec(codec) => {
                let stored = codec.save(state.get(key));
                snapshot.insert(key.to_string(), stored.unwrap_or(Value::Null));
            }
            CodecNode::Tree(nested) => {
                let empty = Value::Object(Map::new());
                let slice = state.get(key).unwrap_or(&empty);
                snapshot.insert(key.to_string(), create_backup(slice, nested));
            }
        }
    }

    Value::Object(snapshot)
}

/// Reconstruct state from a snapshot produced by [`create_backup`]
///
/// Every declared key is loaded at most once; codecs may pull siblings on
/// demand through the loader. The result is `base` shallow-merged with the
/// loaded slices: keys absent from the codec tree keep their `base` value
/// untouched, and a codec loading `None` removes its key.
pub fn load_backup(
    base: &Value,
    tree: &CodecTree,
    snapshot: Option<&Value>,
) -> Result<Value, BackupError> {
    let mut loader = DependencyLoader::new(base, tree, snapshot);

    // Declared keys not already pulled in as dependencies
    for key in tree.keys() {
        loader.load_key(key)?;
    }

    let mut merged = match base {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    for (key, slice) in loader.into_loaded() {
        match slice {
            Some(value) => {
                merged.insert(key, value);
            }
            None => {
                merged.remove(&key);
            }
        }
    }

    Ok(Value::Object(merged))
}

/// Per-call helper letting one slice's load step read or adjust another
/// slice's in-progress loaded value
///
/// Scoped to a single [`load_backup`] call; all bookkeeping is discarded
/// on return.
pub struct DependencyLoader<'a> {
    base: &'a Value,
    tree: &'a CodecTree,
    snapshot: Option<&'a Value>,
    /// Slices loaded so far; presence means "loaded", even when the codec
    /// produced nothing
    loaded: AHashMap<String, Option<Value>>,
    /// Keys currently mid-load, outermost first (the cycle detector)
    in_progress: SmallVec<[String; 4]>,
}

impl<'a> DependencyLoader<'a> {
    fn new(base: &'a Value, tree: &'a CodecTree, snapshot: Option<&'a Value>) -> Self {
        Self {
            base,
            tree,
            snapshot,
            loaded: AHashMap::new(),
            in_progress: SmallVec::new(),
        }
    }

    /// Lazily load a sibling slice and return its loaded value
    ///
    /// Triggers the sibling's codec if it has not run yet. Fails on a
    /// dependency cycle or an undeclared key.
    pub fn needs(&mut self, key: &str) -> Result<Option<Value>, BackupError> {
        self.load_key(key)?;
        Ok(self.loaded.get(key).cloned().flatten())
    }

    /// Adjust an already-loaded sibling's value, pulling it in first if
    /// needed
    ///
    /// A record patch shallow-merges over the loaded value; anything else
    /// (scalar, sequence) overwrites it outright.
    pub fn update(&mut self, key: &str, patch: Value) -> Result<(), BackupError> {
        self.load_key(key)?;

        let slot = self.loaded.entry(key.to_string()).or_insert(None);
        let merged = match patch {
            Value::Object(patch_map) => {
                let mut target = match slot.take() {
                    Some(Value::Object(map)) => map,
                    _ => Map::new(),
                };
                for (k, v) in patch_map {
                    target.insert(k, v);
                }
                Value::Object(target)
            }
            other => other,
        };
        *slot = Some(merged);
        Ok(())
    }

    /// Load one declared key, dispatching on its node kind
    fn load_key(&mut self, key: &str) -> Result<(), BackupError> {
        if self.loaded.contains_key(key) {
            return Ok(());
        }

        if let Some(pos) = self.in_progress.iter().position(|k| k == key) {
            let mut cycle: Vec<String> = self.in_progress[pos..].to_vec();
            cycle.push(key.to_string());
            return Err(BackupError::CircularDependency { cycle });
        }

        let tree = self.tree;
        let node = tree.get(key).ok_or_else(|| BackupError::UndeclaredKey {
            key: key.to_string(),
        })?;

        let stored = self
            .snapshot
            .and_then(|s| s.get(key))
            .filter(|v| !v.is_null());

        tracing::trace!(slice = key, "loading slice");
        self.in_progress.push(key.to_string());

        let value = match node {
            CodecNode::Codec(codec) => codec.load(stored, self)?,
            CodecNode::Tree(nested) => {
                let empty = Value::Object(Map::new());
                let nested_base = self.base.get(key).unwrap_or(&empty);
                Some(load_backup(nested_base, nested, stored)?)
            }
        };

        self.in_progress.pop();

        if self.loaded.insert(key.to_string(), value).is_some() {
            return Err(BackupError::DoubleLoad {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    fn into_loaded(self) -> AHashMap<String, Option<Value>> {
        self.loaded
    }
}
