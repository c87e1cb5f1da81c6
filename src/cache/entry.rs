//! Cache Entry Module
//!
//! Defines the structure for individual cached responses and the clock they are aged by.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// A cached upstream payload with its creation time.
///
/// This is also the on-disk format: `{"data": ..., "timestamp": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The cached payload
    pub data: Value,
    /// Creation timestamp (Unix milliseconds)
    pub timestamp: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(data: Value) -> Self {
        Self {
            data,
            timestamp: current_timestamp_ms(),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has outlived the given TTL.
    ///
    /// Boundary condition: the entry is still fresh at exactly
    /// `timestamp + ttl_ms` and expired one millisecond later.
    pub fn is_expired(&self, ttl_ms: u64) -> bool {
        self.is_expired_at(ttl_ms, current_timestamp_ms())
    }

    /// Same as [`is_expired`](Self::is_expired) against an explicit clock reading.
    pub fn is_expired_at(&self, ttl_ms: u64, now_ms: u64) -> bool {
        now_ms > self.timestamp.saturating_add(ttl_ms)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// A clock set before the epoch reads as 0.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(json!({"price": 189.5}));

        assert_eq!(entry.data["price"], 189.5);
        assert!(entry.timestamp > 0);
        assert!(!entry.is_expired(60_000));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(json!("v"));

        sleep(Duration::from_millis(20));

        assert!(entry.is_expired(0));
        assert!(!entry.is_expired(60_000));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry {
            data: json!(null),
            timestamp: 1_000,
        };

        assert!(!entry.is_expired_at(500, 1_500), "fresh at exactly ttl");
        assert!(entry.is_expired_at(500, 1_501), "expired one ms later");
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let entry = CacheEntry::new(json!(1));
        assert!(!entry.is_expired(u64::MAX));
    }

    #[test]
    fn test_disk_format() {
        let entry = CacheEntry {
            data: json!({"a": 1}),
            timestamp: 1_700_000_000_000,
        };

        let text = serde_json::to_string(&entry).unwrap();
        assert_eq!(text, r#"{"data":{"a":1},"timestamp":1700000000000}"#);

        let parsed: CacheEntry = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, entry);
    }
}
