//! Cache Statistics Module
//!
//! Metrics sink injected into the engine, plus an atomic-counter
//! implementation backing the `/stats` endpoint.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

// == Expiry Source ==
/// Which path physically removed an expired entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirySource {
    /// A `get` found the entry expired
    Read,
    /// The vacuum found the entry expired
    Sweep,
}

// == Cycle Report ==
/// Outcome of one complete vacuum pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Keys visited during the pass
    pub scanned: usize,
    /// Entries the pass removed
    pub evicted: usize,
    /// Per-entry failures that were logged and skipped
    pub failed: usize,
    /// Per-key pause used for the pass
    pub pacing_delay: Duration,
    /// Wall time of the pass
    pub elapsed: Duration,
    /// Exact count written to the counter, if reconciliation succeeded
    pub reconciled: Option<usize>,
}

// == Metrics Sink ==
/// Receives engine events. Every method defaults to a no-op.
pub trait MetricsSink: Send + Sync + fmt::Debug {
    fn record_hit(&self) {}

    fn record_miss(&self) {}

    fn record_expired(&self, _source: ExpirySource) {}

    fn record_reconciled(&self, _size: usize) {}

    fn record_vacuum_cycle(&self, _report: &CycleReport) {}
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {}

// == Cache Stats ==
/// Tracks cache performance metrics with relaxed atomics.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    lazy_expirations: AtomicU64,
    swept_expirations: AtomicU64,
    vacuum_cycles: AtomicU64,
    last_reconciled: AtomicU64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a point-in-time copy of every counter.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            lazy_expirations: self.lazy_expirations.load(Ordering::Relaxed),
            swept_expirations: self.swept_expirations.load(Ordering::Relaxed),
            vacuum_cycles: self.vacuum_cycles.load(Ordering::Relaxed),
            last_reconciled: self.last_reconciled.load(Ordering::Relaxed),
        }
    }
}

impl MetricsSink for CacheStats {
    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_expired(&self, source: ExpirySource) {
        let counter = match source {
            ExpirySource::Read => &self.lazy_expirations,
            ExpirySource::Sweep => &self.swept_expirations,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record_reconciled(&self, size: usize) {
        self.last_reconciled.store(size as u64, Ordering::Relaxed);
    }

    fn record_vacuum_cycle(&self, _report: &CycleReport) {
        self.vacuum_cycles.fetch_add(1, Ordering::Relaxed);
    }
}

// == Stats Snapshot ==
/// Serializable view of [`CacheStats`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    /// Number of `get` calls that returned a value
    pub hits: u64,
    /// Number of `get` calls that found nothing live
    pub misses: u64,
    /// Entries removed by readers
    pub lazy_expirations: u64,
    /// Entries removed by the vacuum
    pub swept_expirations: u64,
    /// Completed vacuum passes
    pub vacuum_cycles: u64,
    /// Exact count written at the most recent reconciliation
    pub last_reconciled: u64,
}

impl StatsSnapshot {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
