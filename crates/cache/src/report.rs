//! In-process report cache backed by DashMap for lock-free concurrent access.
//! Keyed by content fingerprint, so a re-exported but unchanged snapshot
//! reuses the previous computation instead of running the pipeline again.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use screenreach_core::config::CacheConfig;
use screenreach_reporting::ExposureReportSet;

struct CacheEntry {
    report: Arc<ExposureReportSet>,
    inserted_at: Instant,
}

/// Lock-free cache for computed report sets.
pub struct ReportCache {
    store: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl ReportCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            store: Arc::new(DashMap::with_capacity(config.max_entries)),
            ttl: Duration::from_secs(config.ttl_secs),
            max_entries: config.max_entries,
        }
    }

    /// Get a report set from the cache, returns None if expired or missing.
    pub fn get(&self, key: &str) -> Option<Arc<ExposureReportSet>> {
        let entry = self.store.get(key)?;
        if entry.inserted_at.elapsed() > self.ttl {
            drop(entry);
            self.store.remove(key);
            return None;
        }
        Some(Arc::clone(&entry.report))
    }

    /// Insert or update a report set.
    pub fn put(&self, key: String, report: Arc<ExposureReportSet>) {
        // At capacity new keys are skipped. evict_expired reclaims space.
        if self.store.len() >= self.max_entries && !self.store.contains_key(&key) {
            return;
        }
        self.store.insert(
            key,
            CacheEntry {
                report,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Return the cached set for `key`, computing and storing it on a miss.
    /// Concurrent misses on the same key may compute twice, last write wins.
    pub fn get_or_compute<F>(&self, key: String, compute: F) -> Arc<ExposureReportSet>
    where
        F: FnOnce() -> ExposureReportSet,
    {
        if let Some(report) = self.get(&key) {
            metrics::counter!("cache.report.hit").increment(1);
            return report;
        }
        metrics::counter!("cache.report.miss").increment(1);
        debug!(key = key.as_str(), "report cache miss");

        let report = Arc::new(compute());
        self.put(key, Arc::clone(&report));
        report
    }

    /// Remove expired entries. Call this periodically from a background task.
    pub fn evict_expired(&self) -> usize {
        let before = self.store.len();
        self.store
            .retain(|_, entry| entry.inserted_at.elapsed() <= self.ttl);
        before - self.store.len()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
