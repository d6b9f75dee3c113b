//! Core types and configuration for worklens.
//!
//! This crate provides the fundamental data structures shared by the
//! worklens crates: workspace entries and snapshots, the discovery
//! configuration, error/warning types, and the glob exclusion compiler.

mod config;
mod entry;
mod error;
mod pattern;
mod paths;
mod snapshot;

pub use config::{DiscoveryConfig, DiscoveryConfigBuilder, default_exclude_patterns};
pub use entry::{DESCRIPTOR_SUFFIX, EntryKind, REPOSITORY_MARKER, WorkspaceEntry};
pub use error::{DiscoveryError, ScanWarning, WarningKind};
pub use pattern::{ExclusionSet, glob_matches};
pub use paths::{normalize_lexically, resolve_relative};
pub use snapshot::ScanSnapshot;
