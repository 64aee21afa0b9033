//! Path-keyed cache of loaded incident tables.
//!
//! The loader is expensive (a full CSV parse), so every caller obtains the
//! canonical table through [`TableCache::get_or_load`]. The first call for a
//! path runs the loader; later calls share the same [`Arc`]. Entries never
//! expire: the source file is a static snapshot.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use dashboard_core::error::Result;
use dashboard_core::models::IncidentTable;

// ── CacheStats ────────────────────────────────────────────────────────────────

/// Lookup counters since the cache was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

// ── TableCache ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Inner {
    tables: HashMap<PathBuf, Arc<IncidentTable>>,
    stats: CacheStats,
}

/// Memo of loaded tables keyed by source path.
///
/// # Example
/// ```no_run
/// use dashboard_runtime::cache::TableCache;
/// use dashboard_runtime::data::reader::load_incidents;
/// use std::path::Path;
///
/// let cache = TableCache::new();
/// let table = cache
///     .get_or_load(Path::new("NYPD_Shooting_Incident_Data__Historic_.csv"), load_incidents)
///     .unwrap();
/// println!("{} incidents", table.len());
/// ```
#[derive(Default)]
pub struct TableCache {
    inner: Mutex<Inner>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the cached table for `path`, running `loader` on a miss.
    ///
    /// The lock is held across the load so concurrent callers for the same
    /// path run the loader once. A loader error is returned as-is and
    /// nothing is stored.
    pub fn get_or_load<F>(&self, path: &Path, loader: F) -> Result<Arc<IncidentTable>>
    where
        F: FnOnce(&Path) -> Result<IncidentTable>,
    {
        let key = cache_key(path);
        let mut inner = self.lock();

        if let Some(table) = inner.tables.get(&key).cloned() {
            inner.stats.hits += 1;
            tracing::debug!(path = %key.display(), "table cache hit");
            return Ok(table);
        }

        inner.stats.misses += 1;
        tracing::debug!(path = %key.display(), "table cache miss; loading");
        let table = Arc::new(loader(path)?);
        inner.tables.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Store `table` under `path`, replacing any previous entry.
    pub fn insert(&self, path: &Path, table: IncidentTable) -> Arc<IncidentTable> {
        let table = Arc::new(table);
        self.lock().tables.insert(cache_key(path), Arc::clone(&table));
        table
    }

    /// The cached table for `path`, without loading. Does not touch the stats.
    pub fn get(&self, path: &Path) -> Option<Arc<IncidentTable>> {
        self.lock().tables.get(&cache_key(path)).cloned()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.lock().tables.contains_key(&cache_key(path))
    }

    /// Drop the entry for `path`. Returns `true` if one was present.
    pub fn invalidate(&self, path: &Path) -> bool {
        let removed = self.lock().tables.remove(&cache_key(path)).is_some();
        if removed {
            tracing::debug!(path = %path.display(), "table cache entry invalidated");
        }
        removed
    }

    /// Drop every entry. Stats are kept.
    pub fn clear(&self) {
        self.lock().tables.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().tables.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    // ── Private helpers ───────────────────────────────────────────────────

    /// A poisoned lock still guards a consistent map: entries are only
    /// inserted after a successful load.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Canonical form of `path` when it exists, the path verbatim otherwise.
fn cache_key(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
