//! Cache Module
//!
//! Provides the concurrent store, the approximate entry counter and the
//! TTL-aware engine composing them.

mod counter;
mod engine;
mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use counter::Counter;
pub use engine::CacheEngine;
pub use entry::Entry;
pub use stats::{CacheStats, CycleReport, ExpirySource, MetricsSink, NoopMetrics, StatsSnapshot};
pub use store::ConcurrentStore;
