use std::path::{Path, PathBuf};
use std::time::SystemTime;

use worklens_core::{
    DiscoveryConfig, EntryKind, ExclusionSet, WorkspaceEntry, glob_matches, resolve_relative,
};

#[test]
fn test_entry_kind_discrimination() {
    let descriptor = EntryKind::Descriptor {
        folders: vec![PathBuf::from("/root/lib")],
    };
    assert!(descriptor.is_descriptor());
    assert!(!descriptor.is_repository());

    let repository = EntryKind::Repository;
    assert!(repository.is_repository());
    assert!(!repository.is_descriptor());
}

#[test]
fn test_entry_identity_is_path() {
    let a = WorkspaceEntry::from_descriptor(
        "/dev/app.code-workspace",
        SystemTime::now(),
        Vec::new(),
    );
    let b = WorkspaceEntry::from_descriptor(
        "/dev/app.code-workspace",
        SystemTime::UNIX_EPOCH,
        Vec::new(),
    );
    assert_eq!(a.path, b.path);
    assert_eq!(a.name, b.name);
}

#[test]
fn test_declared_folder_resolution_example() {
    // descriptor at /root/proj/app.code-workspace declaring "../lib"
    let dir = Path::new("/root/proj");
    assert_eq!(resolve_relative(dir, "../lib"), PathBuf::from("/root/lib"));
}

#[test]
fn test_default_excludes_cover_common_directories() {
    let config = DiscoveryConfig::new(["/dev"]);
    let set = ExclusionSet::compile(&config.exclude_patterns);

    assert!(set.is_excluded(Path::new("/dev/app/node_modules/left-pad")));
    assert!(set.is_excluded(Path::new("/dev/app/.git/objects")));
    assert!(set.is_excluded(Path::new("/dev/app/dist/main.js")));
    assert!(!set.is_excluded(Path::new("/dev/app/src/main.rs")));

    assert!(set.is_fast_skip("node_modules"));
    assert!(set.is_fast_skip(".git"));
}

#[test]
fn test_glob_subset_round_trip() {
    assert!(glob_matches("/a/b/cache", "**/{cache,tmp}"));
    assert!(glob_matches("/a/b/tmp", "**/{cache,tmp}"));
    assert!(!glob_matches("/a/b/temp", "**/{cache,tmp}"));
}
