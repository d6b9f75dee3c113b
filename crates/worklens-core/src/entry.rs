//! Workspace entry types.

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// File name suffix that marks a workspace descriptor file.
pub const DESCRIPTOR_SUFFIX: &str = ".code-workspace";

/// Directory name that marks a plain folder as a repository workspace.
pub const REPOSITORY_MARKER: &str = ".git";

/// How a workspace was recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// A `.code-workspace` descriptor file.
    Descriptor {
        /// Member folders declared by the descriptor, resolved to
        /// absolute paths against the descriptor's directory.
        folders: Vec<PathBuf>,
    },
    /// A directory recognized purely by its version-control marker.
    Repository,
}

impl EntryKind {
    /// Check if this is a descriptor-file workspace.
    pub fn is_descriptor(&self) -> bool {
        matches!(self, EntryKind::Descriptor { .. })
    }

    /// Check if this is a repository-folder workspace.
    pub fn is_repository(&self) -> bool {
        matches!(self, EntryKind::Repository)
    }
}

/// A single discovered workspace.
///
/// Immutable once built; identity is the absolute `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceEntry {
    /// Absolute path to the descriptor file, or the folder path for
    /// repository workspaces.
    pub path: PathBuf,

    /// Display name, derived from the file stem or folder basename.
    pub name: CompactString,

    /// How this workspace was recognized.
    pub kind: EntryKind,

    /// Last modification time of the descriptor file or folder.
    pub modified: SystemTime,
}

impl WorkspaceEntry {
    /// Create an entry for a descriptor file.
    pub fn from_descriptor(
        path: impl Into<PathBuf>,
        modified: SystemTime,
        folders: Vec<PathBuf>,
    ) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self {
            path,
            name,
            kind: EntryKind::Descriptor { folders },
            modified,
        }
    }

    /// Create an entry for a repository folder.
    pub fn from_repository(path: impl Into<PathBuf>, modified: SystemTime) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self {
            path,
            name,
            kind: EntryKind::Repository,
            modified,
        }
    }

    /// Check if this entry is a descriptor-file workspace.
    pub fn is_descriptor(&self) -> bool {
        self.kind.is_descriptor()
    }

    /// Check if this entry is a repository-folder workspace.
    pub fn is_repository(&self) -> bool {
        self.kind.is_repository()
    }

    /// Folders declared by the descriptor (empty for repositories).
    pub fn folders(&self) -> &[PathBuf] {
        match &self.kind {
            EntryKind::Descriptor { folders } => folders,
            EntryKind::Repository => &[],
        }
    }

    /// The directory this workspace lives in: the parent for descriptor
    /// files, the folder itself for repositories.
    pub fn directory(&self) -> &Path {
        match self.kind {
            EntryKind::Descriptor { .. } => {
                self.path.parent().unwrap_or_else(|| self.path.as_path())
            }
            EntryKind::Repository => self.path.as_path(),
        }
    }

    /// Path segments of this entry's directory below `root`, for tree
    /// display. Empty when the directory is the root itself or lies
    /// outside it.
    pub fn relative_segments(&self, root: &Path) -> Vec<String> {
        let Ok(rel) = self.directory().strip_prefix(root) else {
            return Vec::new();
        };
        rel.components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect()
    }
}

/// Derive the display name: file stem for descriptors, basename otherwise.
fn display_name(path: &Path) -> CompactString {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    match base.strip_suffix(DESCRIPTOR_SUFFIX) {
        Some(stem) if !stem.is_empty() => CompactString::new(stem),
        _ => CompactString::new(base),
    }
}
