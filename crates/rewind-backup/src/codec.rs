//! The codec registry
//!
//! A codec tree is declarative configuration built once at startup: each
//! key maps either to a [`Codec`] governing that slice or to a nested tree
//! mirroring the shape of the state underneath it. The tree's own keys are
//! the projection — state keys it does not declare are never backed up.

use crate::backup::DependencyLoader;
use crate::error::BackupError;
use serde_json::Value;
use std::fmt;

/// Save/load pair governing one slice of the state tree
///
/// `save` projects the live slice into its minimal stored form; `load`
/// rebuilds the slice from that stored form, optionally pulling sibling
/// slices through the [`DependencyLoader`].
///
/// A `None` from `save` is recorded in the snapshot as JSON null
/// ("explicitly not backed up"); a stored null is handed back to `load` as
/// `None`. A `None` from `load` removes the key from the restored state.
pub trait Codec {
    /// Project the live slice into its stored form
    fn save(&self, slice: Option<&Value>) -> Option<Value>;

    /// Rebuild the slice from its stored form
    fn load(
        &self,
        stored: Option<&Value>,
        deps: &mut DependencyLoader<'_>,
    ) -> Result<Option<Value>, BackupError>;
}

/// Codec backed by a pair of closures
pub struct FnCodec<S, L> {
    save: S,
    load: L,
}

impl<S, L> FnCodec<S, L>
where
    S: Fn(Option<&Value>) -> Option<Value>,
    L: Fn(Option<&Value>, &mut DependencyLoader<'_>) -> Result<Option<Value>, BackupError>,
{
    /// Create a codec from save and load closures
    pub fn new(save: S, load: L) -> Self {
        Self { save, load }
    }
}

impl<S, L> Codec for FnCodec<S, L>
where
    S: Fn(Option<&Value>) -> Option<Value>,
    L: Fn(Option<&Value>, &mut DependencyLoader<'_>) -> Result<Option<Value>, BackupError>,
{
    fn save(&self, slice: Option<&Value>) -> Option<Value> {
        (self.save)(slice)
    }

    fn load(
        &self,
        stored: Option<&Value>,
        deps: &mut DependencyLoader<'_>,
    ) -> Result<Option<Value>, BackupError> {
        (self.load)(stored, deps)
    }
}

/// Codec that stores the slice exactly as it is
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Codec for Passthrough {
    fn save(&self, slice: Option<&Value>) -> Option<Value> {
        slice.cloned()
    }

    fn load(
        &self,
        stored: Option<&Value>,
        _deps: &mut DependencyLoader<'_>,
    ) -> Result<Option<Value>, BackupError> {
        Ok(stored.cloned())
    }
}

/// One node of the codec tree: a codec leaf or a nested tree
///
/// The tag is explicit so a stored payload that happens to contain a field
/// named `save` can never be mistaken for a codec.
pub enum CodecNode {
    /// A codec governing the slice at this key
    Codec(Box<dyn Codec>),
    /// A nested tree mirroring the state shape underneath this key
    Tree(CodecTree),
}

impl fmt::Debug for CodecNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecNode::Codec(_) => f.write_str("Codec"),
            CodecNode::Tree(tree) => f.debug_tuple("Tree").field(tree).finish(),
        }
    }
}

/// Declaration-ordered mapping from state keys to codec nodes
///
/// Iteration follows declaration order, which fixes the order slices are
/// saved and the default order they are loaded. Load-order *dependencies*
/// are expressed through the [`DependencyLoader`] instead, so declaration
/// order never has to encode them.
#[derive(Default)]
pub struct CodecTree {
    entries: Vec<(String, CodecNode)>,
}

impl fmt::Debug for CodecTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, n)| (k, n)))
            .finish()
    }
}

impl CodecTree {
    /// Create an empty codec tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a codec for `key` (replaces any earlier declaration)
    pub fn with_codec(mut self, key: impl Into<String>, codec: impl Codec + 'static) -> Self {
        self.insert(key.into(), CodecNode::Codec(Box::new(codec)));
        self
    }

    /// Declare a nested tree for `key` (replaces any earlier declaration)
    pub fn with_tree(mut self, key: impl Into<String>, tree: CodecTree) -> Self {
        self.insert(key.into(), CodecNode::Tree(tree));
        self
    }

    /// Look up the node declared for `key`
    pub fn get(&self, key: &str) -> Option<&CodecNode> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }

    /// Declared keys, in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Declared entries, in declaration order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &CodecNode)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), n))
    }

    /// Number of declared keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no keys are declared
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: String, node: CodecNode) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = node,
            None => self.entries.push((key, node)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_declaration_order_preserved() {
        let tree = CodecTree::new()
            .with_codec("zebra", Passthrough)
            .with_codec("apple", Passthrough)
            .with_codec("mango", Passthrough);

        let keys: Vec<_> = tree.keys().collect();
        assert_eq!(keys, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_redeclaring_a_key_replaces_in_place() {
        let tree = CodecTree::new()
            .with_codec("a", Passthrough)
            .with_codec("b", Passthrough)
            .with_tree("a", CodecTree::new());

        let keys: Vec<_> = tree.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert!(matches!(tree.get("a"), Some(CodecNode::Tree(_))));
    }

    #[test]
    fn test_passthrough_save_clones_slice() {
        let slice = json!({"x": 1});
        assert_eq!(Passthrough.save(Some(&slice)), Some(slice));
        assert_eq!(Passthrough.save(None), None);
    }

    #[test]
    fn test_lookup_missing_key() {
        let tree = CodecTree::new().with_codec("a", Passthrough);
        assert!(tree.get("b").is_none());
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
    }
}
