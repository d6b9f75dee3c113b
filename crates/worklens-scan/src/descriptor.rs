//! Descriptor file parsing.
//!
//! A descriptor is a JSON object with a `folders` array of
//! `{ "path": … }` objects. Unknown keys are ignored; unreadable or
//! malformed content yields an empty folder list, never an error.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::fs;

use worklens_core::resolve_relative;

#[derive(Debug, Deserialize)]
struct DescriptorFile {
    #[serde(default)]
    folders: Vec<DescriptorFolder>,
}

#[derive(Debug, Deserialize)]
struct DescriptorFolder {
    path: String,
}

/// Read the member folders a descriptor declares, resolved to absolute
/// paths against the descriptor's own directory.
pub async fn declared_folders(path: &Path) -> Vec<PathBuf> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "descriptor unreadable");
            return Vec::new();
        }
    };
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    parse_declared_folders(&raw, dir, path)
}

fn parse_declared_folders(raw: &str, dir: &Path, origin: &Path) -> Vec<PathBuf> {
    match serde_json::from_str::<DescriptorFile>(raw) {
        Ok(descriptor) => descriptor
            .folders
            .iter()
            .map(|folder| resolve_relative(dir, &folder.path))
            .collect(),
        Err(err) => {
            tracing::debug!(path = %origin.display(), %err, "descriptor malformed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Vec<PathBuf> {
        parse_declared_folders(
            raw,
            Path::new("/root/proj"),
            Path::new("/root/proj/app.code-workspace"),
        )
    }

    #[test]
    fn test_relative_folder_resolution() {
        let folders = parse(r#"{"folders":[{"path":"../lib"},{"path":"sub"}]}"#);
        assert_eq!(
            folders,
            vec![PathBuf::from("/root/lib"), PathBuf::from("/root/proj/sub")]
        );
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let folders =
            parse(r#"{"folders":[{"path":"a","name":"A"}],"settings":{"editor.tabSize":2}}"#);
        assert_eq!(folders, vec![PathBuf::from("/root/proj/a")]);
    }

    #[test]
    fn test_missing_folders_key() {
        assert!(parse("{}").is_empty());
    }

    #[test]
    fn test_malformed_json_yields_empty() {
        assert!(parse("{not json").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_absolute_folder_kept() {
        let folders = parse(r#"{"folders":[{"path":"/opt/shared"}]}"#);
        assert_eq!(folders, vec![PathBuf::from("/opt/shared")]);
    }
}
