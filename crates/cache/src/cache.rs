use crate::snapshot::{CacheKey, CachedValue, Snapshot};
use crate::warm;
use arc_swap::ArcSwap;
use folio_config::CacheConfig;
use folio_search::{EngineHandle, SearchEngine};
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::instrument;

/// Shortest period accepted by [`NavigationCache::spawn_refresh`].
pub const MIN_REFRESH_PERIOD: Duration = Duration::from_secs(1);

/// Process-wide navigation cache.
///
/// Holds the currently published [`Snapshot`] behind an [`ArcSwap`]: readers
/// load it without locking and never wait for a rebuild, writers replace it
/// whole. Writers (rebuilds and sample write-backs) are serialised by a
/// single lock, so at most one rebuild runs at a time.
///
/// The cache is meant to be shared as an `Arc<NavigationCache>` handle passed
/// explicitly to request handlers.
pub struct NavigationCache {
    config: CacheConfig,
    current: ArcSwap<Snapshot>,
    writer: Mutex<()>,
}

impl NavigationCache {
    /// An empty cache: every lookup misses until the first rebuild.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_snapshot(config, Snapshot::default())
    }

    /// A cache with a fixed initial snapshot.
    pub fn with_snapshot(config: CacheConfig, snapshot: Snapshot) -> Self {
        Self {
            config,
            current: ArcSwap::from_pointee(snapshot),
            writer: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The currently published snapshot.
    ///
    /// Hold on to the returned `Arc` for the duration of a request so every
    /// lookup comes from the same snapshot, even if a rebuild completes
    /// mid-request.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Looks a key up in the currently published snapshot. A miss means the
    /// caller must compute the value live.
    pub fn lookup(&self, key: &CacheKey) -> Option<CachedValue> {
        self.current.load().get(key).cloned()
    }

    /// Builds a brand-new snapshot from the engine and publishes it.
    ///
    /// Waits for any rebuild already in progress. Individual warm jobs may
    /// fail (they are logged and their keys left out), but the snapshot is
    /// always published as a whole once every job has run.
    #[instrument(skip_all, fields(engine = engine.name()))]
    pub async fn rebuild(&self, engine: &dyn SearchEngine) -> Arc<Snapshot> {
        let _writer = self.writer.lock().await;
        let generation = self.current.load().generation() + 1;
        let snapshot = Arc::new(warm::build(engine, &self.config, generation).boxed().await);
        self.current.store(Arc::clone(&snapshot));
        snapshot
    }

    /// Replaces the published snapshot with a fixed one.
    pub async fn publish(&self, snapshot: Snapshot) {
        let _writer = self.writer.lock().await;
        self.current.store(Arc::new(snapshot));
    }

    /// Publishes a copy of the current snapshot with one extra entry.
    ///
    /// The copy keeps the generation and build time of the snapshot it was
    /// made from, so [`Snapshot::age`] keeps measuring time since the last
    /// rebuild.
    ///
    /// Returns `false` (and does nothing) while another writer holds the
    /// lock, usually a rebuild about to publish fresher data anyway.
    pub fn remember(&self, key: CacheKey, value: CachedValue) -> bool {
        let Ok(_writer) = self.writer.try_lock() else {
            tracing::debug!(?key, "Skipping cache write-back, writer busy");
            return false;
        };
        let next = self.current.load().with(key, value);
        self.current.store(Arc::new(next));
        true
    }

    /// Rebuilds the cache every `period`, starting immediately.
    ///
    /// The task runs until the returned handle is aborted. Periods shorter
    /// than [`MIN_REFRESH_PERIOD`] are raised to it.
    pub fn spawn_refresh(self: Arc<Self>, engine: EngineHandle, period: Duration) -> JoinHandle<()> {
        let period = period.max(MIN_REFRESH_PERIOD);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.rebuild(&*engine).await;
            }
        })
    }

    /// Starts the periodic rebuild configured by `refresh_interval_secs`.
    ///
    /// Returns `None` when no interval is configured; the cache then only
    /// changes on explicit rebuilds.
    pub fn spawn_configured_refresh(self: Arc<Self>, engine: EngineHandle) -> Option<JoinHandle<()>> {
        let Some(period) = self.config.refresh_interval() else {
            tracing::debug!("No refresh interval configured, skipping periodic rebuild");
            return None;
        };
        tracing::info!(period_secs = period.as_secs(), "Starting periodic navigation cache rebuild");
        Some(self.spawn_refresh(engine, period))
    }
}
