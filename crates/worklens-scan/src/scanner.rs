//! Semaphore-bounded recursive directory scanner.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use tokio::fs;
use tokio::sync::{Mutex, Semaphore};

use worklens_core::{
    DESCRIPTOR_SUFFIX, DiscoveryConfig, ExclusionSet, REPOSITORY_MARKER, ScanSnapshot,
    ScanWarning, WorkspaceEntry,
};

use crate::descriptor;

/// Workspace scanner with a hard ceiling on in-flight filesystem reads.
pub struct WorkspaceScanner;

impl WorkspaceScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Walk every configured root and collect discovered workspaces.
    ///
    /// Infallible by design: unreadable directories and malformed
    /// descriptors degrade to warnings and empty folder lists.
    pub async fn scan(&self, config: &DiscoveryConfig) -> ScanSnapshot {
        let start = Instant::now();

        let ctx = ScanContext {
            max_depth: config.max_depth,
            include_repositories: config.include_repositories,
            exclusions: ExclusionSet::compile(&config.exclude_patterns),
            limiter: Semaphore::new(config.concurrency.max(1)),
            claimed: Mutex::new(HashSet::new()),
            entries: Mutex::new(Vec::new()),
            warnings: Mutex::new(Vec::new()),
        };

        join_all(
            config
                .roots
                .iter()
                .map(|root| scan_directory(&ctx, root.clone(), 0)),
        )
        .await;

        let mut entries = ctx.entries.into_inner();
        entries.sort_by_cached_key(|e| (e.name.to_lowercase(), e.path.clone()));
        let warnings = ctx.warnings.into_inner();

        tracing::debug!(
            entries = entries.len(),
            warnings = warnings.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scan complete"
        );

        ScanSnapshot::new(entries, start.elapsed(), warnings)
    }
}

impl Default for WorkspaceScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared state of one scan execution. Never shared across scans.
struct ScanContext {
    max_depth: u32,
    include_repositories: bool,
    exclusions: ExclusionSet,
    limiter: Semaphore,
    claimed: Mutex<HashSet<PathBuf>>,
    entries: Mutex<Vec<WorkspaceEntry>>,
    warnings: Mutex<Vec<ScanWarning>>,
}

impl ScanContext {
    /// Claim a candidate path. First claim wins; later duplicates from
    /// overlapping roots or aliased targets are skipped.
    async fn claim(&self, path: &Path) -> bool {
        self.claimed.lock().await.insert(path.to_path_buf())
    }

    async fn push_entry(&self, entry: WorkspaceEntry) {
        self.entries.lock().await.push(entry);
    }

    async fn warn(&self, warning: ScanWarning) {
        self.warnings.lock().await.push(warning);
    }
}

/// Scan one directory level and recurse into accepted children.
///
/// The semaphore permit covers only the listing itself and is released
/// before recursion, so the ceiling bounds simultaneous directory reads
/// across the whole scan rather than deadlocking on tree depth.
fn scan_directory<'a>(ctx: &'a ScanContext, dir: PathBuf, depth: u32) -> BoxFuture<'a, ()> {
    async move {
        if depth > ctx.max_depth {
            return;
        }

        let mut subdirs = Vec::new();
        let mut descriptors = Vec::new();
        let mut has_marker = false;

        {
            let Ok(_permit) = ctx.limiter.acquire().await else {
                return;
            };

            let mut reader = match fs::read_dir(&dir).await {
                Ok(reader) => reader,
                Err(err) => {
                    // Unreadable directory: abandon this subtree only.
                    tracing::debug!(path = %dir.display(), %err, "skipping unreadable directory");
                    ctx.warn(ScanWarning::read_error(&dir, &err)).await;
                    return;
                }
            };

            loop {
                let entry = match reader.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(err) => {
                        ctx.warn(ScanWarning::read_error(&dir, &err)).await;
                        break;
                    }
                };

                let name = entry.file_name().to_string_lossy().into_owned();
                let path = entry.path();
                // The listing already carries the entry type; no stat here.
                let Ok(file_type) = entry.file_type().await else {
                    continue;
                };

                if file_type.is_dir() {
                    if name == REPOSITORY_MARKER {
                        has_marker = true;
                        continue;
                    }
                    // Cheap basename checks before the compiled regex.
                    if name.starts_with('.') || ctx.exclusions.is_fast_skip(&name) {
                        continue;
                    }
                    if ctx.exclusions.is_excluded(&path) {
                        continue;
                    }
                    subdirs.push(path);
                } else if file_type.is_file() && name.ends_with(DESCRIPTOR_SUFFIX) {
                    if ctx.exclusions.is_excluded(&path) {
                        continue;
                    }
                    if ctx.claim(&path).await {
                        descriptors.push(path);
                    }
                }
            }
        }

        // Parse every descriptor found at this level concurrently.
        let parsed = join_all(
            descriptors
                .into_iter()
                .map(|path| read_descriptor(ctx, path)),
        )
        .await;
        for entry in parsed.into_iter().flatten() {
            ctx.push_entry(entry).await;
        }

        if ctx.include_repositories && has_marker && ctx.claim(&dir).await {
            let modified = modified_time(&dir).await;
            ctx.push_entry(WorkspaceEntry::from_repository(dir.clone(), modified))
                .await;
        }

        join_all(
            subdirs
                .into_iter()
                .map(|sub| scan_directory(ctx, sub, depth + 1)),
        )
        .await;
    }
    .boxed()
}

/// Parse one claimed descriptor file into an entry.
async fn read_descriptor(ctx: &ScanContext, path: PathBuf) -> Option<WorkspaceEntry> {
    // Descriptor reads count against the same ceiling as listings.
    let Ok(_permit) = ctx.limiter.acquire().await else {
        return None;
    };
    let (folders, modified) =
        tokio::join!(descriptor::declared_folders(&path), modified_time(&path));
    Some(WorkspaceEntry::from_descriptor(path, modified, folders))
}

async fn modified_time(path: &Path) -> SystemTime {
    match fs::metadata(path).await {
        Ok(meta) => meta.modified().unwrap_or(UNIX_EPOCH),
        Err(_) => UNIX_EPOCH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn write_descriptor(path: &Path, content: &str) {
        std_fs::write(path, content).unwrap();
    }

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        std_fs::create_dir_all(root.join("proj/team")).unwrap();
        std_fs::create_dir_all(root.join("repo/.git")).unwrap();
        std_fs::create_dir_all(root.join("node_modules/dep")).unwrap();

        write_descriptor(&root.join("top.code-workspace"), r#"{"folders":[]}"#);
        write_descriptor(
            &root.join("proj/team/x.code-workspace"),
            r#"{"folders":[{"path":"../lib"}]}"#,
        );
        write_descriptor(
            &root.join("node_modules/dep/hidden.code-workspace"),
            r#"{"folders":[]}"#,
        );

        temp
    }

    #[tokio::test]
    async fn test_basic_scan() {
        let temp = create_test_tree();
        let config = DiscoveryConfig::new([temp.path()]);

        let scanner = WorkspaceScanner::new();
        let snapshot = scanner.scan(&config).await;

        let names: Vec<&str> = snapshot.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["repo", "top", "x"]);
    }

    #[tokio::test]
    async fn test_depth_cutoff() {
        let temp = create_test_tree();
        let root = temp.path();

        // `x.code-workspace` sits two levels down; depth 2 reaches it.
        let config = DiscoveryConfig::builder()
            .roots(vec![root.to_path_buf()])
            .max_depth(2u32)
            .include_repositories(false)
            .build()
            .unwrap();
        let snapshot = WorkspaceScanner::new().scan(&config).await;
        assert!(snapshot.iter().any(|e| e.name == "x"));

        // Depth 1 stops before proj/team.
        let config = DiscoveryConfig::builder()
            .roots(vec![root.to_path_buf()])
            .max_depth(1u32)
            .include_repositories(false)
            .build()
            .unwrap();
        let snapshot = WorkspaceScanner::new().scan(&config).await;
        assert!(!snapshot.iter().any(|e| e.name == "x"));
    }

    #[tokio::test]
    async fn test_exclusions_prune_subtrees() {
        let temp = create_test_tree();
        let config = DiscoveryConfig::new([temp.path()]);

        let snapshot = WorkspaceScanner::new().scan(&config).await;
        assert!(!snapshot.iter().any(|e| e.name == "hidden"));
    }

    #[tokio::test]
    async fn test_repository_surfacing_flag() {
        let temp = create_test_tree();

        let config = DiscoveryConfig::builder()
            .roots(vec![temp.path().to_path_buf()])
            .include_repositories(false)
            .build()
            .unwrap();
        let snapshot = WorkspaceScanner::new().scan(&config).await;
        assert!(snapshot.iter().all(|e| !e.is_repository()));
    }

    #[tokio::test]
    async fn test_overlapping_roots_deduplicate() {
        let temp = create_test_tree();
        let root = temp.path().to_path_buf();
        let config = DiscoveryConfig::new([root.clone(), root.join("proj")]);

        let snapshot = WorkspaceScanner::new().scan(&config).await;
        let xs = snapshot.iter().filter(|e| e.name == "x").count();
        assert_eq!(xs, 1);
    }

    #[tokio::test]
    async fn test_declared_folders_resolved() {
        let temp = create_test_tree();
        let config = DiscoveryConfig::new([temp.path()]);

        let snapshot = WorkspaceScanner::new().scan(&config).await;
        let entry = snapshot.iter().find(|e| e.name == "x").unwrap();
        assert_eq!(entry.folders().to_vec(), vec![temp.path().join("proj/lib")]);
    }

    #[tokio::test]
    async fn test_rescan_is_idempotent() {
        let temp = create_test_tree();
        let config = DiscoveryConfig::new([temp.path()]);
        let scanner = WorkspaceScanner::new();

        let first = scanner.scan(&config).await;
        let second = scanner.scan(&config).await;

        let paths = |s: &ScanSnapshot| s.iter().map(|e| e.path.clone()).collect::<Vec<_>>();
        assert_eq!(paths(&first), paths(&second));
    }

    #[tokio::test]
    async fn test_concurrency_floor_of_one() {
        let temp = create_test_tree();
        let config = DiscoveryConfig::builder()
            .roots(vec![temp.path().to_path_buf()])
            .concurrency(1usize)
            .build()
            .unwrap();

        let snapshot = WorkspaceScanner::new().scan(&config).await;
        assert!(snapshot.iter().any(|e| e.name == "top"));
    }

    #[tokio::test]
    async fn test_sorted_case_insensitively() {
        let temp = TempDir::new().unwrap();
        write_descriptor(&temp.path().join("beta.code-workspace"), "{}");
        write_descriptor(&temp.path().join("Alpha.code-workspace"), "{}");
        write_descriptor(&temp.path().join("gamma.code-workspace"), "{}");

        let config = DiscoveryConfig::new([temp.path()]);
        let snapshot = WorkspaceScanner::new().scan(&config).await;

        let names: Vec<&str> = snapshot.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "gamma"]);
    }

    #[tokio::test]
    async fn test_dot_directories_skipped() {
        let temp = TempDir::new().unwrap();
        std_fs::create_dir(temp.path().join(".config")).unwrap();
        write_descriptor(
            &temp.path().join(".config/stash.code-workspace"),
            r#"{"folders":[]}"#,
        );

        let config = DiscoveryConfig::new([temp.path()]);
        let snapshot = WorkspaceScanner::new().scan(&config).await;
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_missing_root_yields_warning_not_failure() {
        let temp = TempDir::new().unwrap();
        let gone = temp.path().join("does-not-exist");

        let config = DiscoveryConfig::new([gone]);
        let snapshot = WorkspaceScanner::new().scan(&config).await;

        assert!(snapshot.is_empty());
        assert!(snapshot.has_warnings());
    }
}
