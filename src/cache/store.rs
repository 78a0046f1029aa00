//! Concurrent Store Module
//!
//! Sharded key-to-entry map shared by request handlers and the vacuum.
//! Knows nothing about TTLs beyond the conditional removal used for expiry.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use crate::cache::Entry;

// == Concurrent Store ==
/// Thread-safe mapping from key to [`Entry`].
///
/// Backed by `DashMap`, so callers never hold an external lock: reads only
/// contend with writes to the same shard. Cloning is cheap and yields a
/// handle to the same map.
#[derive(Debug, Clone, Default)]
pub struct ConcurrentStore {
    entries: Arc<DashMap<String, Entry>>,
}

impl ConcurrentStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Get ==
    /// Returns a copy of the entry stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<Entry> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    // == Set ==
    /// Inserts or overwrites the entry for `key`.
    ///
    /// Returns the entry that was replaced, if the key was structurally present.
    pub fn set(&self, key: String, entry: Entry) -> Option<Entry> {
        self.entries.insert(key, entry)
    }

    // == Delete ==
    /// Removes `key`, returning the removed entry. Absent keys are a no-op.
    pub fn delete(&self, key: &str) -> Option<Entry> {
        self.entries.remove(key).map(|(_, entry)| entry)
    }

    // == Remove If Expired ==
    /// Removes `key` only if the entry currently stored under it has outlived `ttl`.
    ///
    /// The check and the removal happen under the shard lock, so of several
    /// racing callers at most one gets `true`, and an entry rewritten between a
    /// caller's expiry check and this call is left alone.
    pub fn remove_if_expired(&self, key: &str, ttl: Duration) -> bool {
        self.entries
            .remove_if(key, |_, entry| entry.is_expired(ttl))
            .is_some()
    }

    // == Range ==
    /// Invokes `visit` for each entry currently held.
    ///
    /// Shards are locked one at a time, so writers running concurrently may
    /// or may not be observed. `visit` must not call back into this store.
    pub fn range<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &Entry),
    {
        for item in self.entries.iter() {
            visit(item.key(), item.value());
        }
    }

    // == Keys ==
    /// Collects the keys currently held.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.entries.len());
        self.range(|key, _| keys.push(key.to_owned()));
        keys
    }

    // == Contains ==
    /// Returns true if `key` is structurally present, expired or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Length ==
    /// Counts the entries currently held by walking every shard.
    pub fn len(&self) -> usize {
        let mut count = 0;
        self.range(|_, _| count += 1);
        count
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
