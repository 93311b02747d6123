//! Disk-backed document cache with a fixed disk budget
//!
//! There is no eviction. Once the cache file grows past `max_filesize` the
//! cache stops accepting writes for the rest of the process lifetime and keeps
//! serving whatever it already holds. Reopening the directory on restart
//! resets that state.

use crate::error::Result;
use crate::log_store::LogStore;
use crate::types::{CacheConfig, CacheStats, Document};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// A document cache over a `LogStore` that latches writes off when full
pub struct BoundedLocalCache {
    /// Underlying key-value file
    store: LogStore,
    /// Writes between file size checks
    check_frequency: u64,
    /// Cache file size above which writes are disabled
    max_filesize: u64,
    /// Writes since the last size check
    writes: AtomicU64,
    /// Cleared once the size limit is exceeded, never set again
    writes_enabled: AtomicBool,
    /// Cache hit counter
    hits: AtomicU64,
    /// Cache miss counter
    misses: AtomicU64,
}

impl BoundedLocalCache {
    /// Open the cache directory described by `config`
    pub async fn open(config: &CacheConfig) -> Result<Self> {
        let store = LogStore::open(&config.dir).await?;
        info!(
            cache_dir = ?config.dir,
            check_frequency = config.check_frequency,
            max_filesize = config.max_filesize,
            "Cache initialized"
        );

        Ok(Self {
            store,
            check_frequency: config.check_frequency.max(1),
            max_filesize: config.max_filesize,
            writes: AtomicU64::new(0),
            writes_enabled: AtomicBool::new(true),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    /// Look up a document. Unreadable or undecodable entries count as absent.
    pub async fn get(&self, key: &str) -> Option<Document> {
        let bytes = match self.store.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read cache entry");
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(document) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(document)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to decode cache entry");
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.store.contains(key).await
    }

    /// Path of the cache data file
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Store a document. Does nothing once writes have been disabled.
    pub async fn set(&self, key: &str, document: &Document) -> Result<()> {
        if !self.writes_enabled() {
            return Ok(());
        }

        let bytes = serde_json::to_vec(document)?;
        self.store.set(key, &bytes).await?;

        if self.record_write() {
            self.check_max_size_reached().await?;
        }
        Ok(())
    }

    pub fn writes_enabled(&self) -> bool {
        self.writes_enabled.load(Ordering::SeqCst)
    }

    /// Count a write. Returns true for the one caller whose write completes a
    /// `check_frequency` cycle; the counter is back at zero afterwards.
    fn record_write(&self) -> bool {
        let frequency = self.check_frequency;
        let previous = self
            .writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                Some(if n + 1 >= frequency { 0 } else { n + 1 })
            })
            .unwrap_or_default();
        previous + 1 >= frequency
    }

    async fn check_max_size_reached(&self) -> Result<()> {
        let filesize = self.store.disk_size().await?;
        debug!(filesize, "Cache file size");

        if filesize > self.max_filesize && self.writes_enabled.swap(false, Ordering::SeqCst) {
            info!(
                filesize,
                max_filesize = self.max_filesize,
                "Cache file size exceeded limit, disabling writes to cache"
            );
        }
        Ok(())
    }

    /// Get current cache statistics
    pub async fn stats(&self) -> CacheStats {
        let disk_size = match self.store.disk_size().await {
            Ok(size) => size,
            Err(e) => {
                warn!(error = %e, "Failed to read cache file size");
                0
            }
        };

        CacheStats {
            entries: self.store.len().await,
            disk_size,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes_enabled: self.writes_enabled(),
        }
    }
}
