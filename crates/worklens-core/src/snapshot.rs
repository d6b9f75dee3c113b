//! Scan result container.

use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::entry::WorkspaceEntry;
use crate::error::ScanWarning;

/// The deduplicated, name-sorted result of one completed scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSnapshot {
    /// Discovered workspaces, sorted by display name.
    pub entries: Vec<WorkspaceEntry>,

    /// When this scan completed.
    pub captured_at: SystemTime,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Non-fatal warnings encountered during the scan.
    pub warnings: Vec<ScanWarning>,
}

impl ScanSnapshot {
    /// Create a new snapshot captured now.
    pub fn new(
        entries: Vec<WorkspaceEntry>,
        scan_duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        Self {
            entries,
            captured_at: SystemTime::now(),
            scan_duration,
            warnings,
        }
    }

    /// Number of discovered workspaces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the snapshot holds no workspaces.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if there were any warnings during the scan.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Iterate over the discovered workspaces in display order.
    pub fn iter(&self) -> impl Iterator<Item = &WorkspaceEntry> {
        self.entries.iter()
    }
}
