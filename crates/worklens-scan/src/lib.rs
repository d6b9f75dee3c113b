//! Workspace discovery scanning for worklens.
//!
//! This crate walks configured root directories looking for
//! `.code-workspace` descriptor files and git-marked repository folders.
//!
//! # Overview
//!
//! `worklens-scan` performs a recursive, parallel walk with a hard ceiling
//! on simultaneous filesystem operations:
//!
//! - **Bounded concurrency** via a semaphore shared by the whole scan,
//!   so large trees cannot exhaust file-descriptor limits
//! - **Exclusion rules** checked cheaply (basename set) before the
//!   compiled glob regex
//! - **Deduplication** across overlapping roots, first claim wins
//! - **Fault isolation**: an unreadable directory abandons only its own
//!   subtree
//!
//! # Example
//!
//! ```rust,no_run
//! use worklens_core::DiscoveryConfig;
//! use worklens_scan::WorkspaceScanner;
//!
//! # async fn run() {
//! let config = DiscoveryConfig::new(["/home/user/dev"]);
//! let scanner = WorkspaceScanner::new();
//! let snapshot = scanner.scan(&config).await;
//!
//! for entry in snapshot.iter() {
//!     println!("{} ({})", entry.name, entry.path.display());
//! }
//! # }
//! ```

mod descriptor;
mod scanner;

pub use descriptor::declared_folders;
pub use scanner::WorkspaceScanner;

// Re-export core types for convenience
pub use worklens_core::{
    DiscoveryConfig, EntryKind, ScanSnapshot, ScanWarning, WarningKind, WorkspaceEntry,
};
