//! Coalescing discovery orchestrator.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::{Mutex, broadcast};

use worklens_core::{DiscoveryConfig, DiscoveryError, ScanSnapshot};
use worklens_scan::WorkspaceScanner;

/// One scan shared among every caller that arrives while it runs.
type SharedScan = Shared<BoxFuture<'static, Arc<ScanSnapshot>>>;

/// Coordinates scans and the snapshot cache.
///
/// At most one physical scan runs at a time; concurrent requests join the
/// in-flight scan and all receive the same result. Passive reads never
/// fire the "changed" notification — only [`refresh`](Self::refresh)
/// does, exactly once, after the new snapshot is stored.
pub struct DiscoveryEngine {
    config: Arc<DiscoveryConfig>,
    scanner: Arc<WorkspaceScanner>,
    cache: Arc<Mutex<crate::SnapshotCache>>,
    in_flight: Arc<Mutex<Option<SharedScan>>>,
    changed_tx: broadcast::Sender<()>,
}

impl DiscoveryEngine {
    /// Create an engine for the given configuration.
    ///
    /// Rejects invalid configuration up front; everything downstream is
    /// infallible.
    pub fn new(config: DiscoveryConfig) -> Result<Self, DiscoveryError> {
        if config.concurrency == 0 {
            return Err(DiscoveryError::invalid_config(
                "concurrency must be at least 1",
            ));
        }

        let (changed_tx, _) = broadcast::channel(16);
        let cache = crate::SnapshotCache::new(config.cache_ttl());

        Ok(Self {
            config: Arc::new(config),
            scanner: Arc::new(WorkspaceScanner::new()),
            cache: Arc::new(Mutex::new(cache)),
            in_flight: Arc::new(Mutex::new(None)),
            changed_tx,
        })
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Current workspaces: the cached unexpired snapshot when available
    /// and not forced, otherwise the result of a (possibly joined) scan.
    ///
    /// Never fires "changed".
    pub async fn entries(&self, force_refresh: bool) -> Arc<ScanSnapshot> {
        if !force_refresh {
            if let Some(snapshot) = self.cache.lock().await.get() {
                return snapshot;
            }
        }
        self.scan_coalesced().await
    }

    /// Drop the cached snapshot, rescan, then fire "changed" exactly
    /// once — strictly after the new snapshot is stored, so listeners
    /// reading back see consistent data.
    pub async fn refresh(&self) -> Arc<ScanSnapshot> {
        // Silent clear: invalidate() here would ping expiry listeners and
        // loop them straight back into this method.
        self.cache.lock().await.clear();
        let snapshot = self.scan_coalesced().await;
        let _ = self.changed_tx.send(());
        snapshot
    }

    /// Subscribe to the "changed" notification.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.changed_tx.subscribe()
    }

    /// Forward an external invalidation trigger (e.g. a configuration
    /// change) to the cache. Emits one expiry event.
    pub async fn invalidate_cache(&self) {
        self.cache.lock().await.invalidate();
    }

    /// Subscribe to explicit cache-invalidation events.
    pub async fn subscribe_expired(&self) -> broadcast::Receiver<()> {
        self.cache.lock().await.subscribe_expired()
    }

    /// Join the in-flight scan, or start one if none is running.
    ///
    /// The scan future stores its snapshot in the cache and releases the
    /// in-flight slot itself before completing, so the slot can never be
    /// left holding a finished scan.
    async fn scan_coalesced(&self) -> Arc<ScanSnapshot> {
        let scan = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.as_ref() {
                Some(scan) => {
                    tracing::trace!("joining in-flight scan");
                    scan.clone()
                }
                None => {
                    let scanner = Arc::clone(&self.scanner);
                    let config = Arc::clone(&self.config);
                    let cache = Arc::clone(&self.cache);
                    let slot = Arc::clone(&self.in_flight);

                    let scan: SharedScan = async move {
                        let snapshot = Arc::new(scanner.scan(&config).await);
                        cache.lock().await.set(Arc::clone(&snapshot));
                        *slot.lock().await = None;
                        snapshot
                    }
                    .boxed()
                    .shared();

                    *in_flight = Some(scan.clone());
                    scan
                }
            }
        };
        scan.await
    }
}
