//! Discovery orchestration for worklens.
//!
//! This crate owns the engine's only mutable shared state: the cached
//! snapshot slot and the in-flight scan handle. Consumers read the
//! current snapshot, force refreshes, and subscribe to a single
//! "changed" notification channel.
//!
//! # Example
//!
//! ```rust,no_run
//! use worklens_core::DiscoveryConfig;
//! use worklens_engine::DiscoveryEngine;
//!
//! # async fn run() -> Result<(), worklens_core::DiscoveryError> {
//! let engine = DiscoveryEngine::new(DiscoveryConfig::new(["/home/user/dev"]))?;
//!
//! let mut changed = engine.subscribe();
//! let snapshot = engine.entries(false).await;
//! println!("{} workspaces", snapshot.len());
//!
//! engine.refresh().await;
//! changed.recv().await.ok();
//! # Ok(())
//! # }
//! ```

mod cache;
mod engine;

pub use cache::SnapshotCache;
pub use engine::DiscoveryEngine;

// Re-export core types for convenience
pub use worklens_core::{DiscoveryConfig, DiscoveryError, ScanSnapshot, WorkspaceEntry};
