//! Declarative backup and restore for nested state trees
//!
//! This crate provides:
//! - The codec registry: [`Codec`] save/load pairs arranged in a
//!   declaration-ordered [`CodecTree`]
//! - [`create_backup`]: project a state tree into the minimal serializable
//!   snapshot the codec tree declares
//! - [`load_backup`]: reconstruct state from a snapshot, resolving
//!   cross-slice load dependencies lazily via the [`DependencyLoader`]
//!
//! The engine never mutates the host's state in place; every call produces
//! a fresh value and all bookkeeping is scoped to that call.

pub mod backup;
pub mod codec;
pub mod error;

// Re-exports
pub use backup::{create_backup, load_backup, DependencyLoader};
pub use codec::{Codec, CodecNode, CodecTree, FnCodec, Passthrough};
pub use error::BackupError;
