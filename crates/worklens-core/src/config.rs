//! Discovery configuration.

use std::path::PathBuf;
use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for workspace discovery.
///
/// All values are supplied explicitly by the caller; nothing is read from
/// ambient state, so scanner and engine behavior is fully determined by
/// this struct. Root paths must already be resolved (the CLI expands `~`
/// before building the config).
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct DiscoveryConfig {
    /// Ordered root directories to scan.
    pub roots: Vec<PathBuf>,

    /// Maximum recursion depth below each root (0 = root level only).
    #[builder(default = "5")]
    #[serde(default = "default_depth")]
    pub max_depth: u32,

    /// Glob patterns excluding paths from the scan.
    #[builder(default = "default_exclude_patterns()")]
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Surface directories carrying a version-control marker as
    /// repository workspaces.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_repositories: bool,

    /// Maximum simultaneous directory/file reads. Bounds file-descriptor
    /// usage on large trees.
    #[builder(default = "16")]
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Snapshot time-to-live in seconds (0 disables expiry).
    #[builder(default = "300")]
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Merge chains of single-child folders in the tree view.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub condense_folders: bool,
}

/// Default exclusion globs: dependency and build-output directories.
pub fn default_exclude_patterns() -> Vec<String> {
    [
        "**/node_modules/**",
        "**/.git/**",
        "**/bower_components/**",
        "**/.hg/**",
        "**/.svn/**",
        "**/dist/**",
        "**/build/**",
        "**/.next/**",
        "**/.nuxt/**",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_true() -> bool {
    true
}

fn default_depth() -> u32 {
    5
}

fn default_concurrency() -> usize {
    16
}

fn default_cache_ttl() -> u64 {
    300
}

impl DiscoveryConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(0) = self.concurrency {
            return Err("concurrency must be at least 1".to_string());
        }
        Ok(())
    }
}

impl DiscoveryConfig {
    /// Create a new config builder.
    pub fn builder() -> DiscoveryConfigBuilder {
        DiscoveryConfigBuilder::default()
    }

    /// Create a simple config scanning the given roots with defaults.
    pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            max_depth: default_depth(),
            exclude_patterns: default_exclude_patterns(),
            include_repositories: true,
            concurrency: default_concurrency(),
            cache_ttl_secs: default_cache_ttl(),
            condense_folders: true,
        }
    }

    /// Cache time-to-live as a duration; `ZERO` disables expiry.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = DiscoveryConfig::builder()
            .roots(vec![PathBuf::from("/home/user/dev")])
            .max_depth(3u32)
            .concurrency(4usize)
            .build()
            .unwrap();

        assert_eq!(config.roots, vec![PathBuf::from("/home/user/dev")]);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.concurrency, 4);
        assert!(config.include_repositories);
    }

    #[test]
    fn test_config_simple() {
        let config = DiscoveryConfig::new(["/home/user"]);
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.concurrency, 16);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert!(!config.exclude_patterns.is_empty());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let result = DiscoveryConfig::builder()
            .roots(Vec::<PathBuf>::new())
            .concurrency(0usize)
            .build();
        assert!(result.is_err());
    }
}
