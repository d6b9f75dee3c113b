//! Lexical path helpers.
//!
//! Descriptor files declare member folders relative to their own
//! directory. Resolution is purely lexical: `.` and `..` collapse without
//! touching the filesystem, so declared folders that do not (yet) exist
//! still resolve to stable absolute paths.

use std::path::{Component, Path, PathBuf};

/// Resolve a raw declared path against a base directory.
///
/// Absolute inputs are normalized as-is; relative inputs are joined onto
/// `base` first.
pub fn resolve_relative(base: &Path, raw: &str) -> PathBuf {
    let raw = Path::new(raw);
    if raw.is_absolute() {
        normalize_lexically(raw)
    } else {
        normalize_lexically(&base.join(raw))
    }
}

/// Collapse `.` and `..` components without consulting the filesystem.
///
/// `..` at the root stays at the root.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(Component::ParentDir),
            },
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_sibling() {
        assert_eq!(
            resolve_relative(Path::new("/root/proj"), "../lib"),
            PathBuf::from("/root/lib")
        );
    }

    #[test]
    fn test_resolve_relative_dot() {
        assert_eq!(
            resolve_relative(Path::new("/root/proj"), "./src"),
            PathBuf::from("/root/proj/src")
        );
        assert_eq!(
            resolve_relative(Path::new("/root/proj"), "."),
            PathBuf::from("/root/proj")
        );
    }

    #[test]
    fn test_resolve_absolute_passthrough() {
        assert_eq!(
            resolve_relative(Path::new("/root/proj"), "/opt/lib/../data"),
            PathBuf::from("/opt/data")
        );
    }

    #[test]
    fn test_parent_at_root_is_clamped() {
        assert_eq!(
            normalize_lexically(Path::new("/../../x")),
            PathBuf::from("/x")
        );
    }

    #[test]
    fn test_relative_parent_preserved() {
        assert_eq!(
            normalize_lexically(Path::new("../a/./b")),
            PathBuf::from("../a/b")
        );
        assert_eq!(
            normalize_lexically(Path::new("../../a")),
            PathBuf::from("../../a")
        );
    }
}
