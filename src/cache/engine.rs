//! Cache Engine Module
//!
//! Combines the concurrent store with the approximate counter and owns entry
//! lifecycle: lazy expiry on read, overwrite semantics on write.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::cache::{ConcurrentStore, Counter, Entry, ExpirySource, MetricsSink};
use crate::config::EngineConfig;
use crate::error::Result;

// == Cache Engine ==
/// TTL-aware key-value cache.
///
/// Clones share the same store, counter and metrics sink.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use expiring_kv::{CacheEngine, EngineConfig, NoopMetrics};
///
/// #[tokio::main]
/// async fn main() {
///     let engine = CacheEngine::new(&EngineConfig::default(), Arc::new(NoopMetrics));
///     engine.set("key1", "value1").await;
///     assert_eq!(engine.get("key1").await.as_deref(), Some("value1"));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CacheEngine {
    store: ConcurrentStore,
    counter: Counter,
    ttl: Duration,
    metrics: Arc<dyn MetricsSink>,
}

impl CacheEngine {
    // == Constructor ==
    /// Creates an engine and starts its counter aggregator.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn new(config: &EngineConfig, metrics: Arc<dyn MetricsSink>) -> Self {
        // The aggregator exits on its own once the last engine clone is dropped
        let (counter, _aggregator) = Counter::spawn(config.counter_queue_capacity);

        Self {
            store: ConcurrentStore::new(),
            counter,
            ttl: config.ttl,
            metrics,
        }
    }

    // == Get ==
    /// Returns the live value for `key`.
    ///
    /// An entry found past its TTL is removed here and reported as absent.
    pub async fn get(&self, key: &str) -> Option<String> {
        let Some(entry) = self.store.get(key) else {
            self.metrics.record_miss();
            return None;
        };

        if entry.is_expired(self.ttl) {
            if let Err(err) = self.expire(key, ExpirySource::Read).await {
                warn!("Lazy expiry of '{}' could not update the counter: {}", key, err);
            }
            self.metrics.record_miss();
            return None;
        }

        self.metrics.record_hit();
        Some(entry.into_value())
    }

    // == Set ==
    /// Stores `value` under `key` with a fresh timestamp.
    ///
    /// The counter is bumped only when the key was not structurally present,
    /// so overwriting a live or not-yet-swept entry never double counts.
    pub async fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let replaced = self.store.set(key.clone(), Entry::new(value));

        if replaced.is_none() {
            if let Err(err) = self.counter.increment().await {
                warn!("Insert of '{}' could not update the counter: {}", key, err);
            }
        }
    }

    // == Size ==
    /// Approximate number of live entries. O(1).
    pub async fn size(&self) -> usize {
        self.counter.read().await.max(0) as usize
    }

    // == Size Precise ==
    /// Exact number of structurally present entries, including expired ones
    /// the vacuum has not reached yet. O(n).
    pub fn size_precise(&self) -> usize {
        self.store.len()
    }

    /// TTL applied to every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The approximate counter behind [`CacheEngine::size`].
    pub fn counter(&self) -> &Counter {
        &self.counter
    }

    pub(crate) fn metrics(&self) -> &dyn MetricsSink {
        self.metrics.as_ref()
    }

    pub(crate) fn snapshot_keys(&self) -> Vec<String> {
        self.store.keys()
    }

    /// Removes `key` if its entry is expired. Returns whether this call removed it.
    pub(crate) async fn evict_if_expired(&self, key: &str) -> Result<bool> {
        self.expire(key, ExpirySource::Sweep).await
    }

    /// Overwrites the counter with a fresh exact count and returns that count.
    pub(crate) async fn reconcile(&self) -> Result<usize> {
        let exact = self.size_precise();
        self.counter.reconcile(exact as i64).await?;
        self.metrics.record_reconciled(exact);
        Ok(exact)
    }

    async fn expire(&self, key: &str, source: ExpirySource) -> Result<bool> {
        // Only the caller whose conditional removal succeeds decrements
        if !self.store.remove_if_expired(key, self.ttl) {
            return Ok(false);
        }

        self.metrics.record_expired(source);
        self.counter.decrement().await?;
        Ok(true)
    }
}
