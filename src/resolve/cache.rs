//! Single-flight color cache shared by every run of a mosaic

use crate::color::ColorKey;
use crate::io::error::Result;
use crate::resolve::lookup::TilePayload;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Append-only map from color key to resolved tile data
///
/// Each key owns a single-flight cell. The first request for a key runs the
/// external lookup; requests arriving while it is in flight wait on the same
/// cell instead of starting their own. Lookups for different keys proceed
/// concurrently. Entries are never evicted.
#[derive(Default)]
pub struct ColorCache {
    /// Color key to resolution cell mapping
    entries: Mutex<HashMap<ColorKey, Arc<OnceCell<TilePayload>>>>,

    /// Cache performance statistics
    stats: Mutex<CacheStats>,
}

/// Performance metrics for cache effectiveness
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered from an already resolved entry
    pub hits: usize,
    /// Requests that found no resolved entry
    pub misses: usize,
    /// External lookups actually performed
    pub lookups: usize,
}

impl CacheStats {
    /// Total number of resolution requests
    pub const fn requests(&self) -> usize {
        self.hits + self.misses
    }
}

impl ColorCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolved payload for `key`, if present
    pub fn get(&self, key: &ColorKey) -> Option<TilePayload> {
        self.entries
            .lock()
            .get(key)
            .and_then(|cell| cell.get().cloned())
    }

    /// Number of resolved entries
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    /// Whether no entry has been resolved yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the statistics
    pub fn stats(&self) -> CacheStats {
        *self.stats.lock()
    }

    /// Retrieve the cached payload or run `lookup` to produce it
    ///
    /// `lookup` runs at most once per key at a time. A failed lookup leaves
    /// the key unresolved.
    ///
    /// # Errors
    ///
    /// Propagates the error of the lookup performed for this request, or of
    /// a retry if the in-flight lookup it waited on failed
    pub async fn get_or_lookup<F, Fut>(&self, key: &ColorKey, lookup: F) -> Result<TilePayload>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TilePayload>>,
    {
        let cell = {
            let mut entries = self.entries.lock();
            Arc::clone(entries.entry(key.clone()).or_default())
        };

        if let Some(payload) = cell.get() {
            self.stats.lock().hits += 1;
            return Ok(payload.clone());
        }
        self.stats.lock().misses += 1;

        let mut performed = false;
        let payload = cell
            .get_or_try_init(|| {
                performed = true;
                self.stats.lock().lookups += 1;
                lookup()
            })
            .await?
            .clone();

        if performed {
            log::debug!("Resolved color #{key} from tile service");
        }
        Ok(payload)
    }
}
