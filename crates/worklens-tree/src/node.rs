//! Folder nodes of the presentation hierarchy.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use worklens_core::WorkspaceEntry;

/// One folder in the derived hierarchy.
///
/// Children keep insertion order, which follows snapshot order and is
/// part of the presentation contract.
#[derive(Debug, Clone)]
pub struct FolderNode {
    /// Folder basename.
    pub name: String,

    /// Real absolute path of this folder.
    pub path: PathBuf,

    /// Child folders in insertion order.
    pub children: IndexMap<String, FolderNode>,

    /// Workspaces living directly in this folder, in snapshot order.
    pub entries: Vec<WorkspaceEntry>,
}

impl FolderNode {
    /// Create an empty folder node.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            children: IndexMap::new(),
            entries: Vec::new(),
        }
    }

    /// A node holding neither child folders nor workspaces.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.entries.is_empty()
    }

    /// Walk/create intermediate folders per segment and place the entry
    /// at the final one (or directly here when `segments` is empty).
    pub(crate) fn insert(&mut self, segments: &[String], entry: WorkspaceEntry) {
        let Some((first, rest)) = segments.split_first() else {
            self.entries.push(entry);
            return;
        };
        let child_path = self.path.join(first);
        let child = self
            .children
            .entry(first.clone())
            .or_insert_with(|| FolderNode::new(first.clone(), child_path));
        child.insert(rest, entry);
    }
}

/// Folder basename for display, falling back to the full path string.
pub(crate) fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
