//! Folder-hierarchy presentation for worklens snapshots.
//!
//! A [`WorkspaceTree`] is derived on demand from a snapshot plus the
//! configured roots and a condense flag. It is ephemeral: rebuilt per
//! presentation request and never persisted, so toggling condensing
//! needs no rescan.

mod node;
mod tree;

pub use node::FolderNode;
pub use tree::{TreeItem, WorkspaceTree};
