//! Configuration Module
//!
//! Handles loading server configuration from environment variables and
//! turning it into the engine's tuning parameters.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Time-to-live of every entry, in milliseconds
    pub ttl_ms: u64,
    /// Upper bound on the time one vacuum pass may spread over, in milliseconds
    pub max_vacuum_cycle_ms: u64,
    /// Lower bound on the per-key pause of the vacuum, in milliseconds
    pub min_pacing_delay_ms: u64,
    /// Number of counter deltas that may be queued before writers wait
    pub counter_queue_capacity: usize,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` - Entry TTL in milliseconds (default: 10000)
    /// - `MAX_VACUUM_CYCLE_MS` - Vacuum cycle cap in milliseconds (default: 60000)
    /// - `MIN_PACING_DELAY_MS` - Per-key vacuum delay floor in milliseconds (default: 1)
    /// - `COUNTER_QUEUE_CAPACITY` - Outstanding counter deltas (default: 1000000)
    /// - `SERVER_PORT` - HTTP server port (default: 8081)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttl_ms: env_or("CACHE_TTL_MS", defaults.ttl_ms),
            max_vacuum_cycle_ms: env_or("MAX_VACUUM_CYCLE_MS", defaults.max_vacuum_cycle_ms),
            min_pacing_delay_ms: env_or("MIN_PACING_DELAY_MS", defaults.min_pacing_delay_ms),
            counter_queue_capacity: env_or(
                "COUNTER_QUEUE_CAPACITY",
                defaults.counter_queue_capacity,
            ),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    /// Builds the engine parameters described by this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_ttl(Duration::from_millis(self.ttl_ms))
            .with_max_cycle(Duration::from_millis(self.max_vacuum_cycle_ms))
            .with_min_pacing_delay(Duration::from_millis(self.min_pacing_delay_ms))
            .with_counter_queue_capacity(self.counter_queue_capacity)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl_ms: 10_000,
            max_vacuum_cycle_ms: 60_000,
            min_pacing_delay_ms: 1,
            counter_queue_capacity: 1_000_000,
            server_port: 8081,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// == Engine Config ==
/// Tuning parameters consumed by the cache engine and its vacuum.
///
/// # Example
///
/// ```rust
/// use expiring_kv::EngineConfig;
/// use std::time::Duration;
///
/// let config = EngineConfig::default()
///     .with_ttl(Duration::from_secs(1))
///     .with_max_cycle(Duration::from_secs(30));
/// assert_eq!(config.cycle_budget(), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Lifetime of every entry, measured from its last `set`
    pub ttl: Duration,
    /// Cap on the time a single vacuum pass is spread over
    pub max_cycle: Duration,
    /// Floor for the per-key vacuum pause
    pub min_pacing_delay: Duration,
    /// Bound of the counter's delta queue
    pub counter_queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10),
            max_cycle: Duration::from_secs(60),
            min_pacing_delay: Duration::from_millis(1),
            counter_queue_capacity: 1_000_000,
        }
    }
}

impl EngineConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_cycle(mut self, max_cycle: Duration) -> Self {
        self.max_cycle = max_cycle;
        self
    }

    pub fn with_min_pacing_delay(mut self, delay: Duration) -> Self {
        self.min_pacing_delay = delay;
        self
    }

    pub fn with_counter_queue_capacity(mut self, capacity: usize) -> Self {
        self.counter_queue_capacity = capacity;
        self
    }

    /// Time allotted to traverse the whole store once: the smaller of the
    /// cycle cap and the TTL.
    pub fn cycle_budget(&self) -> Duration {
        self.max_cycle.min(self.ttl)
    }
}
