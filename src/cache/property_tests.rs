//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the engine's observable guarantees over arbitrary
//! operation sequences.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;
use tokio_test::block_on;

use crate::cache::{CacheEngine, NoopMetrics};
use crate::config::EngineConfig;

// == Test Configuration ==
const LONG_TTL: Duration = Duration::from_secs(300);

fn engine(ttl: Duration) -> CacheEngine {
    let config = EngineConfig::default().with_ttl(ttl);
    CacheEngine::new(&config, Arc::new(NoopMetrics))
}

// == Strategies ==
/// Generates cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,16}".prop_map(|s| s)
}

/// Generates cache values
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,64}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Storing a pair and reading it back before expiry returns the stored value.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        block_on(async {
            let engine = engine(LONG_TTL);
            engine.set(key.clone(), value.clone()).await;
            prop_assert_eq!(engine.get(&key).await, Some(value));
            Ok(())
        })?;
    }

    // Keys that were never set read as absent and leave both sizes at zero.
    #[test]
    fn prop_unset_keys_are_absent(keys in prop::collection::vec(key_strategy(), 1..20)) {
        block_on(async {
            let engine = engine(LONG_TTL);
            for key in &keys {
                prop_assert_eq!(engine.get(key).await, None);
            }
            prop_assert_eq!(engine.counter().settle().await.unwrap(), 0);
            prop_assert_eq!(engine.size_precise(), 0);
            Ok(())
        })?;
    }

    // For any sequence of sets and gets, the settled counter equals the number
    // of distinct keys set, which equals the structural size.
    #[test]
    fn prop_counter_tracks_distinct_keys(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        block_on(async {
            let engine = engine(LONG_TTL);
            let mut distinct = HashSet::new();

            for op in ops {
                match op {
                    CacheOp::Set { key, value } => {
                        engine.set(key.clone(), value).await;
                        distinct.insert(key);
                    }
                    CacheOp::Get { key } => {
                        let found = engine.get(&key).await.is_some();
                        prop_assert_eq!(found, distinct.contains(&key));
                    }
                }
            }

            prop_assert_eq!(engine.size_precise(), distinct.len());
            prop_assert_eq!(engine.counter().settle().await.unwrap(), distinct.len() as i64);
            Ok(())
        })?;
    }

    // Overwriting returns the newest value and never adds to either size.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        values in prop::collection::vec(value_strategy(), 2..10)
    ) {
        block_on(async {
            let engine = engine(LONG_TTL);
            for value in &values {
                engine.set(key.clone(), value.clone()).await;
            }

            let got = engine.get(&key).await;
            prop_assert_eq!(got.as_ref(), values.last());
            prop_assert_eq!(engine.size_precise(), 1);
            prop_assert_eq!(engine.counter().settle().await.unwrap(), 1);
            Ok(())
        })?;
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // After the TTL has elapsed no value is served, and the read removes it.
    #[test]
    fn prop_ttl_expiration_behavior(
        keys in prop::collection::hash_set(key_strategy(), 1..10),
        value in value_strategy()
    ) {
        let ttl = Duration::from_millis(40);
        block_on(async {
            let engine = engine(ttl);
            for key in &keys {
                engine.set(key.clone(), value.clone()).await;
            }
            prop_assert_eq!(engine.size_precise(), keys.len());

            sleep(ttl + Duration::from_millis(20));

            for key in &keys {
                prop_assert_eq!(engine.get(key).await, None);
            }
            prop_assert_eq!(engine.size_precise(), 0);
            prop_assert_eq!(engine.counter().settle().await.unwrap(), 0);
            Ok(())
        })?;
    }
}
