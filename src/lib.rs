//! Expiring KV - An in-memory key-value server with time-to-live expiry
//!
//! Entries expire a fixed TTL after their last write. Reads hide expired
//! entries immediately, and a background vacuum reclaims them at a pace that
//! adapts to the store's size while keeping an approximate count in step.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheEngine, CacheStats, MetricsSink, NoopMetrics};
pub use config::{Config, EngineConfig};
pub use tasks::{spawn_vacuum_task, VacuumHandle};
