//! Snapshot cache with TTL expiry.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;

use worklens_core::ScanSnapshot;

/// Holds the last snapshot until its time-to-live elapses.
///
/// Expiry has two distinct paths with different notification behavior:
///
/// - [`get`](Self::get) clears an expired slot *silently*. A passive read
///   must never fire a notification, or a read triggered by a listener
///   would start an unbounded notify→refresh→notify loop.
/// - [`invalidate`](Self::invalidate) clears unconditionally and emits
///   exactly one event, for external triggers such as a configuration
///   change.
#[derive(Debug)]
pub struct SnapshotCache {
    slot: Option<Arc<ScanSnapshot>>,
    stored_at: Option<Instant>,
    ttl: Duration,
    expired_tx: broadcast::Sender<()>,
}

impl SnapshotCache {
    /// Create a cache with the given time-to-live. `Duration::ZERO`
    /// disables expiry.
    pub fn new(ttl: Duration) -> Self {
        let (expired_tx, _) = broadcast::channel(16);
        Self {
            slot: None,
            stored_at: None,
            ttl,
            expired_tx,
        }
    }

    /// Return the held snapshot, silently dropping it first if expired.
    pub fn get(&mut self) -> Option<Arc<ScanSnapshot>> {
        if self.slot.is_some() && self.is_expired() {
            // Silent path: the caller rescans, nobody gets notified.
            self.clear();
        }
        self.slot.clone()
    }

    /// Store a snapshot and stamp its capture time.
    pub fn set(&mut self, snapshot: Arc<ScanSnapshot>) {
        self.slot = Some(snapshot);
        self.stored_at = Some(Instant::now());
    }

    /// Clear the slot without notifying anyone.
    pub fn clear(&mut self) {
        self.slot = None;
        self.stored_at = None;
    }

    /// Clear the slot and emit exactly one expiry event.
    ///
    /// Must not be called from [`get`](Self::get)'s expiry path.
    pub fn invalidate(&mut self) {
        self.clear();
        let _ = self.expired_tx.send(());
    }

    /// Subscribe to explicit invalidation events.
    pub fn subscribe_expired(&self) -> broadcast::Receiver<()> {
        self.expired_tx.subscribe()
    }

    fn is_expired(&self) -> bool {
        if self.ttl.is_zero() {
            return false;
        }
        match self.stored_at {
            Some(stored_at) => stored_at.elapsed() > self.ttl,
            None => false,
        }
    }
}
