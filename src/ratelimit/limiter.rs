//! Fixed-Window Rate Limiter
//!
//! Time is cut into non-overlapping windows per identifier, each with its own
//! counter. A burst straddling a window boundary can therefore reach twice the
//! limit; that is accepted for a coarse anti-abuse gate.

use std::collections::HashMap;

use axum::http::{HeaderMap, HeaderValue};
use crate::cache::current_timestamp_ms;

// == Rate Limit Entry ==
/// Request count for one identifier in its current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    /// Requests admitted in the current window
    pub count: u32,
    /// Unix milliseconds at which the current window ends
    pub reset_time: u64,
}

// == Rate Limit Decision ==
/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Requests left in the current window
    pub remaining: u32,
    /// Unix milliseconds at which the current window ends
    pub reset_time: u64,
    /// Window capacity of the limiter that decided
    pub limit: u32,
}

impl RateLimitDecision {
    /// Whole seconds until the window resets, at least 1.
    pub fn retry_after_secs(&self, now_ms: u64) -> u64 {
        self.reset_time.saturating_sub(now_ms).div_ceil(1000).max(1)
    }

    /// Writes the `X-RateLimit-*` headers for this decision.
    pub fn write_headers(&self, headers: &mut HeaderMap) {
        headers.insert("x-ratelimit-limit", HeaderValue::from(self.limit));
        headers.insert("x-ratelimit-remaining", HeaderValue::from(self.remaining));
        headers.insert("x-ratelimit-reset", HeaderValue::from(self.reset_time));
    }
}

// == Rate Limiter ==
/// Per-identifier fixed-window counter.
#[derive(Debug)]
pub struct RateLimiter {
    /// Label used in logs and stats
    name: String,
    /// Window length in milliseconds
    window_ms: u64,
    /// Requests admitted per window
    max_requests: u32,
    /// Live windows keyed by client identifier
    entries: HashMap<String, RateLimitEntry>,
}

impl RateLimiter {
    // == Constructor ==
    pub fn new(name: impl Into<String>, window_ms: u64, max_requests: u32) -> Self {
        Self {
            name: name.into(),
            window_ms,
            max_requests,
            entries: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Is Allowed ==
    /// Counts a request from `identifier` and decides whether to admit it.
    pub fn is_allowed(&mut self, identifier: &str) -> RateLimitDecision {
        self.is_allowed_at(identifier, current_timestamp_ms())
    }

    /// Same as [`is_allowed`](Self::is_allowed) against an explicit clock reading.
    ///
    /// A rejected request does not advance the counter.
    pub fn is_allowed_at(&mut self, identifier: &str, now_ms: u64) -> RateLimitDecision {
        let limit = self.max_requests;

        if let Some(entry) = self.entries.get_mut(identifier) {
            if now_ms <= entry.reset_time {
                if entry.count >= limit {
                    return RateLimitDecision {
                        allowed: false,
                        remaining: 0,
                        reset_time: entry.reset_time,
                        limit,
                    };
                }
                entry.count += 1;
                return RateLimitDecision {
                    allowed: true,
                    remaining: limit - entry.count,
                    reset_time: entry.reset_time,
                    limit,
                };
            }
        }

        let entry = RateLimitEntry {
            count: 1,
            reset_time: now_ms.saturating_add(self.window_ms),
        };
        self.entries.insert(identifier.to_string(), entry);
        RateLimitDecision {
            allowed: true,
            remaining: limit.saturating_sub(1),
            reset_time: entry.reset_time,
            limit,
        }
    }

    // == Cleanup Expired ==
    /// Drops identifiers whose window has elapsed. Returns how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        self.cleanup_expired_at(current_timestamp_ms())
    }

    pub fn cleanup_expired_at(&mut self, now_ms: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| now_ms <= entry.reset_time);
        before - self.entries.len()
    }

    /// Current window for `identifier`, if one is tracked.
    pub fn entry(&self, identifier: &str) -> Option<RateLimitEntry> {
        self.entries.get(identifier).copied()
    }

    /// Number of identifiers currently tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000_000;

    #[test]
    fn test_two_request_scenario() {
        let mut limiter = RateLimiter::new("standard", 60_000, 2);

        let first = limiter.is_allowed_at("1.2.3.4", NOW);
        assert!(first.allowed);
        assert_eq!(first.remaining, 1);
        assert_eq!(first.reset_time, NOW + 60_000);

        let second = limiter.is_allowed_at("1.2.3.4", NOW + 10);
        assert!(second.allowed);
        assert_eq!(second.remaining, 0);

        let third = limiter.is_allowed_at("1.2.3.4", NOW + 20);
        assert!(!third.allowed);
        assert_eq!(third.remaining, 0);
        assert_eq!(third.reset_time, NOW + 60_000);
    }

    #[test]
    fn test_rejections_are_free() {
        let mut limiter = RateLimiter::new("strict", 60_000, 1);

        limiter.is_allowed_at("client", NOW);
        for i in 0..5 {
            assert!(!limiter.is_allowed_at("client", NOW + i).allowed);
        }

        assert_eq!(limiter.entry("client").unwrap().count, 1);
    }

    #[test]
    fn test_window_reset() {
        let mut limiter = RateLimiter::new("standard", 1_000, 3);

        for _ in 0..3 {
            limiter.is_allowed_at("client", NOW);
        }
        assert!(!limiter.is_allowed_at("client", NOW + 1_000).allowed);

        let fresh = limiter.is_allowed_at("client", NOW + 1_001);
        assert!(fresh.allowed);
        assert_eq!(fresh.remaining, 2);
        assert_eq!(fresh.reset_time, NOW + 2_001);
    }

    #[test]
    fn test_identifiers_are_independent() {
        let mut limiter = RateLimiter::new("standard", 60_000, 1);

        assert!(limiter.is_allowed_at("a", NOW).allowed);
        assert!(!limiter.is_allowed_at("a", NOW).allowed);
        assert!(limiter.is_allowed_at("b", NOW).allowed);
        assert!(limiter.is_allowed_at("unknown", NOW).allowed);
    }

    #[test]
    fn test_instances_do_not_share_state() {
        let mut standard = RateLimiter::new("standard", 60_000, 100);
        let mut strict = RateLimiter::new("strict", 60_000, 1);

        strict.is_allowed_at("client", NOW);
        assert!(!strict.is_allowed_at("client", NOW).allowed);
        assert_eq!(standard.is_allowed_at("client", NOW).remaining, 99);
    }

    #[test]
    fn test_cleanup_expired() {
        let mut limiter = RateLimiter::new("standard", 1_000, 10);

        limiter.is_allowed_at("old", NOW);
        limiter.is_allowed_at("new", NOW + 5_000);

        assert_eq!(limiter.cleanup_expired_at(NOW + 5_500), 1);
        assert_eq!(limiter.len(), 1);
        assert!(limiter.entry("old").is_none());
        assert!(limiter.entry("new").is_some());
    }

    #[test]
    fn test_real_clock() {
        let mut limiter = RateLimiter::new("standard", 60_000, 5);
        let decision = limiter.is_allowed("client");

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 4);
        assert!(decision.reset_time > current_timestamp_ms());
        assert_eq!(limiter.cleanup_expired(), 0);
    }

    #[test]
    fn test_retry_after_secs() {
        let decision = RateLimitDecision {
            allowed: false,
            remaining: 0,
            reset_time: NOW + 1_500,
            limit: 1,
        };

        assert_eq!(decision.retry_after_secs(NOW), 2);
        assert_eq!(decision.retry_after_secs(NOW + 1_500), 1);
        assert_eq!(decision.retry_after_secs(NOW + 9_000), 1);
    }

    #[test]
    fn test_write_headers() {
        let decision = RateLimitDecision {
            allowed: true,
            remaining: 7,
            reset_time: NOW,
            limit: 10,
        };
        let mut headers = HeaderMap::new();
        decision.write_headers(&mut headers);

        assert_eq!(headers["x-ratelimit-limit"], "10");
        assert_eq!(headers["x-ratelimit-remaining"], "7");
        assert_eq!(headers["x-ratelimit-reset"], NOW.to_string().as_str());
    }
}
