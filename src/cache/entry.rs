//! Cache Entry Module
//!
//! Defines the immutable record stored for every key.

use std::time::{Duration, Instant};

// == Entry ==
/// A stored value paired with the instant it was written.
///
/// Entries are never mutated in place: overwriting a key stores a new
/// `Entry` with a fresh timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    value: String,
    inserted_at: Instant,
}

impl Entry {
    // == Constructor ==
    /// Creates an entry stamped with the current instant.
    pub fn new(value: impl Into<String>) -> Self {
        Self::with_timestamp(value, Instant::now())
    }

    /// Creates an entry with an explicit insertion instant.
    pub fn with_timestamp(value: impl Into<String>, inserted_at: Instant) -> Self {
        Self {
            value: value.into(),
            inserted_at,
        }
    }

    /// Returns the stored value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the entry, returning its value.
    pub fn into_value(self) -> String {
        self.value
    }

    /// Returns the instant the entry was written.
    pub fn inserted_at(&self) -> Instant {
        self.inserted_at
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl` as of now.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.is_expired_at(ttl, Instant::now())
    }

    /// Checks if the entry has outlived `ttl` as of `now`.
    ///
    /// Boundary condition: an entry is expired once `inserted_at + ttl <= now`,
    /// so it is never served at the exact instant its TTL elapses.
    pub fn is_expired_at(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= ttl
    }

    // == Time To Live ==
    /// Returns how long the entry stays live under `ttl`, or zero if expired.
    pub fn ttl_remaining(&self, ttl: Duration) -> Duration {
        ttl.saturating_sub(self.inserted_at.elapsed())
    }
}
