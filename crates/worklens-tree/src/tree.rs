//! Tree construction, condensing and lookup.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use worklens_core::{ScanSnapshot, WorkspaceEntry};

use crate::node::{FolderNode, basename};

/// One presented row: a folder to expand or a workspace leaf.
#[derive(Debug, Clone)]
pub enum TreeItem {
    /// An expandable folder. `name` may be a condensed `a/b/c` chain;
    /// `path` is always the deepest real path, usable with
    /// [`WorkspaceTree::children_of`].
    Folder { name: String, path: PathBuf },
    /// A workspace leaf.
    Workspace(WorkspaceEntry),
}

/// A folder hierarchy derived from one snapshot.
pub struct WorkspaceTree {
    roots: IndexMap<PathBuf, FolderNode>,
    condense: bool,
}

impl WorkspaceTree {
    /// Build the hierarchy for the given roots.
    ///
    /// Each entry is assigned to the first configured root whose prefix
    /// matches it, so overlapping roots cannot duplicate a workspace.
    pub fn build(snapshot: &ScanSnapshot, roots: &[PathBuf], condense: bool) -> Self {
        let mut forest: IndexMap<PathBuf, FolderNode> = roots
            .iter()
            .map(|root| (root.clone(), FolderNode::new(basename(root), root.clone())))
            .collect();

        for entry in snapshot.iter() {
            let owner = roots
                .iter()
                .find(|root| entry.path.starts_with(root) || entry.directory().starts_with(root));
            let Some(owner) = owner else { continue };
            let segments = entry.relative_segments(owner);
            if let Some(node) = forest.get_mut(owner) {
                node.insert(&segments, entry.clone());
            }
        }

        Self {
            roots: forest,
            condense,
        }
    }

    /// Top-level rows: a single configured root is flattened to its own
    /// children; multiple roots present one folder per non-empty root.
    pub fn top_level(&self) -> Vec<TreeItem> {
        if self.roots.len() == 1 {
            if let Some(root) = self.roots.values().next() {
                return self.node_items(root);
            }
        }
        self.roots
            .values()
            .filter(|node| !node.is_empty())
            .map(|node| TreeItem::Folder {
                name: node.name.clone(),
                path: node.path.clone(),
            })
            .collect()
    }

    /// Rows under the folder with the given real path: subfolders first
    /// in insertion order, then workspaces in snapshot order.
    pub fn children_of(&self, path: &Path) -> Vec<TreeItem> {
        match self.find_node(path) {
            Some(node) => self.node_items(node),
            None => Vec::new(),
        }
    }

    /// Whether a path resolves to a presentable (expandable) folder.
    pub fn contains(&self, path: &Path) -> bool {
        self.find_node(path).is_some()
    }

    fn node_items(&self, node: &FolderNode) -> Vec<TreeItem> {
        let mut items = Vec::new();
        for child in node.children.values() {
            let (name, target) = if self.condense {
                condensed_view(child)
            } else {
                (child.name.clone(), child)
            };
            if !target.is_empty() {
                items.push(TreeItem::Folder {
                    name,
                    path: target.path.clone(),
                });
            }
        }
        for entry in &node.entries {
            items.push(TreeItem::Workspace(entry.clone()));
        }
        items
    }

    /// Locate a node by real path. A condensed chain is addressed by its
    /// deepest node's real path, which the plain walk reaches as well.
    fn find_node(&self, target: &Path) -> Option<&FolderNode> {
        self.roots.values().find_map(|root| find_in(root, target))
    }
}

/// Collapse a chain of single-child, entry-free folders into one display
/// name, keeping the deepest node's real path, children and entries.
fn condensed_view(node: &FolderNode) -> (String, &FolderNode) {
    if node.entries.is_empty() && node.children.len() == 1 {
        if let Some(child) = node.children.values().next() {
            let (tail, deepest) = condensed_view(child);
            return (format!("{}/{}", node.name, tail), deepest);
        }
    }
    (node.name.clone(), node)
}

fn find_in<'a>(node: &'a FolderNode, target: &Path) -> Option<&'a FolderNode> {
    if node.path == target {
        return Some(node);
    }
    node.children
        .values()
        .find_map(|child| find_in(child, target))
}
