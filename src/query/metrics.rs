//! Cache metrics.
//!
//! Counters for cache hits, fetches, failures and results thrown away
//! because nobody was observing the key any more. One instance per
//! `QueryClient`.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct QueryMetrics {
    /// Reads served from fresh cached data
    hits: AtomicUsize,

    /// Reads that had to start or join a fetch
    misses: AtomicUsize,

    /// Fetches started (retries of one fetch count once)
    fetches: AtomicUsize,

    /// Fetches that ended in an error
    failures: AtomicUsize,

    /// Fetch results dropped because their key went inactive
    discarded: AtomicUsize,
}

impl QueryMetrics {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn discarded(&self) -> usize {
        self.discarded.load(Ordering::Relaxed)
    }

    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let misses = self.misses();
        let reads = hits + misses;
        let hit_rate = if reads > 0 {
            (hits as f64 / reads as f64) * 100.0
        } else {
            0.0
        };

        let fetches = self.fetches();
        let failures = self.failures();
        let fetch_success_rate = if fetches > 0 {
            (fetches.saturating_sub(failures) as f64 / fetches as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            hits,
            misses,
            hit_rate,
            fetches,
            failures,
            fetch_success_rate,
            discarded: self.discarded(),
        }
    }
}

/// Point-in-time snapshot of a client's counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub hits: usize,
    pub misses: usize,

    /// Percentage (0-100)
    pub hit_rate: f64,

    pub fetches: usize,
    pub failures: usize,

    /// Percentage (0-100)
    pub fetch_success_rate: f64,

    pub discarded: usize,
}
