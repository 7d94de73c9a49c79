//! Bounded cache of loaded secret stores, keyed by file path.
//!
//! Every [`StoreCache::get`] fingerprints the file (at most once per recheck
//! interval) and drops the cached store if the file changed. A reader can
//! therefore observe a value that was replaced on disk for up to one recheck
//! interval, never longer.
//!
//! Locking: the slot table is guarded by one mutex held only for the LRU
//! lookup/insert. Each slot has its own change detector lock and its own
//! load lock, so a slow load of one file never blocks lookups of another.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use secretfile_core::config::CacheConfig;
use tracing::{debug, info};

use crate::error::{Result, SecretError};
use crate::fingerprint::ChangeDetector;
use crate::store::SecretStore;

/// Default number of secrets files held at once.
pub const DEFAULT_CAPACITY: usize = 64;

/// Default minimum time between two fingerprint checks of one file.
pub const DEFAULT_RECHECK_INTERVAL: Duration = Duration::from_millis(5000);

/// One cached file: its change detector and the store loaded from it.
struct CacheSlot {
    path: PathBuf,
    detector: Mutex<ChangeDetector>,
    store: RwLock<Option<Arc<SecretStore>>>,
    /// Serializes loading and discarding of `store`.
    load_lock: Mutex<()>,
}

impl CacheSlot {
    fn new(path: PathBuf) -> Self {
        Self {
            detector: Mutex::new(ChangeDetector::new(path.clone())),
            path,
            store: RwLock::new(None),
            load_lock: Mutex::new(()),
        }
    }

    /// Drop the held store if the file changed since the last check.
    fn refresh(&self, recheck_interval: Duration) -> Result<()> {
        let changed = self
            .detector
            .lock()
            .changed(recheck_interval)
            .map_err(|e| SecretError::file_access(&self.path, e))?;

        if changed {
            // Wait for an in-flight load so it cannot reinstall the old content.
            let _guard = self.load_lock.lock();
            if self.store.write().take().is_some() {
                info!(path = %self.path.display(), "secrets file changed, dropping cached store");
            }
        }
        Ok(())
    }

    fn cached(&self) -> Option<Arc<SecretStore>> {
        self.store.read().as_ref().map(Arc::clone)
    }

    /// Return the held store, loading it first if needed.
    fn get_or_load(&self, loads: &AtomicU64) -> Result<Arc<SecretStore>> {
        if let Some(store) = self.cached() {
            return Ok(store);
        }

        let _guard = self.load_lock.lock();
        if let Some(store) = self.cached() {
            return Ok(store);
        }

        let store = Arc::new(SecretStore::read_from(&self.path)?);
        loads.fetch_add(1, Ordering::Relaxed);
        *self.store.write() = Some(Arc::clone(&store));
        Ok(store)
    }
}

/// LRU cache mapping a secrets file path to its loaded [`SecretStore`].
///
/// Construct one per process and pass it to every lookup path.
pub struct StoreCache {
    slots: Mutex<LruCache<PathBuf, Arc<CacheSlot>>>,
    recheck_interval: Duration,
    loads: AtomicU64,
}

impl StoreCache {
    /// Create a cache holding at most `capacity` files (minimum 1).
    pub fn new(capacity: usize, recheck_interval: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        debug!(capacity = capacity.get(), ?recheck_interval, "creating store cache");
        Self {
            slots: Mutex::new(LruCache::new(capacity)),
            recheck_interval,
            loads: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(
            config.capacity,
            Duration::from_millis(config.recheck_interval_ms),
        )
    }

    /// Return the store for the file at `path`, loading or reloading it as needed.
    ///
    /// Load failures are returned to the caller and not cached; the next call
    /// tries again.
    pub fn get(&self, path: &Path) -> Result<Arc<SecretStore>> {
        let slot = self.slot(path);
        slot.refresh(self.recheck_interval)?;
        slot.get_or_load(&self.loads)
    }

    fn slot(&self, path: &Path) -> Arc<CacheSlot> {
        let mut slots = self.slots.lock();
        if let Some(slot) = slots.get(path) {
            return Arc::clone(slot);
        }

        let slot = Arc::new(CacheSlot::new(path.to_path_buf()));
        if let Some((evicted, _)) = slots.push(path.to_path_buf(), Arc::clone(&slot)) {
            debug!(path = %evicted.display(), "evicted least recently used secrets file");
        }
        slot
    }

    /// Forget the slot for `path`. Returns whether one was present.
    pub fn invalidate(&self, path: &Path) -> bool {
        self.slots.lock().pop(path).is_some()
    }

    /// Drop every slot.
    pub fn clear(&self) {
        self.slots.lock().clear();
    }

    /// Whether a slot for `path` is present. Does not affect LRU order.
    pub fn contains(&self, path: &Path) -> bool {
        self.slots.lock().contains(path)
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.lock().cap().get()
    }

    pub fn recheck_interval(&self) -> Duration {
        self.recheck_interval
    }

    /// Number of times a secrets file has been read and parsed.
    pub fn loads(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }
}

impl Default for StoreCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_RECHECK_INTERVAL)
    }
}
