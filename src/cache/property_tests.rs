//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache contract over generated keys and payloads.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;
use tempfile::TempDir;

use crate::cache::{disk, ResponseCache};
use crate::config::CacheConfig;

// == Strategies ==
/// Generates keys shaped like the ones handlers build (`kind:SYMBOL:extra|extra`)
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{2,10}:[A-Z0-9.^=-]{1,8}(:[a-z0-9|-]{0,16})?"
}

/// Generates arbitrary-ish JSON payloads
fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ]{0,64}".prop_map(|s| json!(s)),
        ("[a-z]{1,8}", any::<i32>()).prop_map(|(k, v)| json!({ k: v })),
        prop::collection::vec(any::<u16>(), 0..8).prop_map(|v| json!(v)),
    ]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Value },
    Get { key: String },
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => Just(CacheOp::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // **Property 1: Round-trip Storage Consistency**
    // A value that was set is returned unchanged by the next get.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let mut cache = ResponseCache::new(CacheConfig::default());

        cache.set(key.clone(), value.clone());

        prop_assert_eq!(cache.get(&key), Some(value));
        prop_assert!(cache.has(&key));
        prop_assert!(!cache.is_expired(&key));
    }

    // **Property 2: Overwrite Semantics**
    // The last set for a key wins and the key occupies a single slot.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let mut cache = ResponseCache::new(CacheConfig::default());

        cache.set(key.clone(), value1);
        cache.set(key.clone(), value2.clone());

        prop_assert_eq!(cache.get(&key), Some(value2));
        prop_assert_eq!(cache.len(), 1);
    }

    // **Property 3: Model Equivalence**
    // Any sequence of set/get/clear behaves like a plain map when nothing expires.
    #[test]
    fn prop_matches_hashmap_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut cache = ResponseCache::new(CacheConfig::default());
        let mut model: HashMap<String, Value> = HashMap::new();
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key.clone(), value.clone());
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let got = cache.get(&key);
                    match model.get(&key) {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                    prop_assert_eq!(got.as_ref(), model.get(&key));
                }
                CacheOp::Clear => {
                    cache.clear();
                    model.clear();
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, model.len());
    }

    // **Property 4: Disabled Cache Never Hits**
    #[test]
    fn prop_disabled_cache_never_hits(key in key_strategy(), value in value_strategy()) {
        let mut cache = ResponseCache::new(CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        });

        cache.set(key.clone(), value);

        prop_assert_eq!(cache.get(&key), None);
        prop_assert!(!cache.has(&key));
        prop_assert!(cache.is_expired(&key));
    }

    // **Property 5: Sanitized File Names**
    // Every key maps to a single path component made of safe characters.
    #[test]
    fn prop_sanitized_key_is_safe(key in ".{0,64}") {
        let stem = disk::sanitize_key(&key);

        prop_assert_eq!(stem.chars().count(), key.chars().count());
        prop_assert!(stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')));
        prop_assert!(!stem.contains(':') && !stem.contains('|'));
    }
}

// Separate proptest blocks with fewer cases for filesystem and time-sensitive tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(10))]

    // **Property 6: Persistence Round-trip**
    // A fresh cache over the same directory sees what a previous one stored.
    #[test]
    fn prop_persistence_roundtrip(key in key_strategy(), value in value_strategy()) {
        let temp_dir = TempDir::new().unwrap();
        let config = CacheConfig {
            enabled: true,
            ttl_seconds: 3600,
            persistence_enabled: true,
            cache_dir: temp_dir.path().to_path_buf(),
        };

        ResponseCache::new(config.clone()).set(key.clone(), value.clone());

        let mut restarted = ResponseCache::new(config);
        prop_assert_eq!(restarted.get(&key), Some(value));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // **Property 7: TTL Expiration Behavior**
    // With a zero TTL every entry is gone after a short delay.
    #[test]
    fn prop_ttl_expiration_behavior(key in key_strategy(), value in value_strategy()) {
        let mut cache = ResponseCache::new(CacheConfig {
            ttl_seconds: 0,
            ..CacheConfig::default()
        });

        cache.set(key.clone(), value);
        sleep(Duration::from_millis(5));

        prop_assert!(cache.is_expired(&key));
        prop_assert!(!cache.has(&key));
        prop_assert_eq!(cache.get(&key), None);
    }
}
