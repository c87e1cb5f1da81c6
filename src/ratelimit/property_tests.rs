//! Property-Based Tests for the Rate Limiter

use proptest::prelude::*;

use crate::ratelimit::RateLimiter;

const NOW: u64 = 1_700_000_000_000;

fn identifier_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}",
        Just("unknown".to_string()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // **Property 1: Countdown Then Reject**
    // A fresh identifier gets exactly N admissions with remaining N-1..0, then a rejection.
    #[test]
    fn prop_countdown_then_reject(
        id in identifier_strategy(),
        max in 1u32..50,
        window_ms in 1u64..120_000
    ) {
        let mut limiter = RateLimiter::new("test", window_ms, max);

        for expected_remaining in (0..max).rev() {
            let decision = limiter.is_allowed_at(&id, NOW);
            prop_assert!(decision.allowed);
            prop_assert_eq!(decision.remaining, expected_remaining);
            prop_assert_eq!(decision.reset_time, NOW + window_ms);
        }

        let rejected = limiter.is_allowed_at(&id, NOW + window_ms);
        prop_assert!(!rejected.allowed);
        prop_assert_eq!(rejected.remaining, 0);
    }

    // **Property 2: Count Never Exceeds Limit**
    // However many calls land in one window, the stored count stays within max.
    #[test]
    fn prop_count_bounded(
        id in identifier_strategy(),
        max in 1u32..20,
        offsets in prop::collection::vec(0u64..1_000, 1..100)
    ) {
        let mut limiter = RateLimiter::new("test", 60_000, max);
        let mut offsets = offsets;
        offsets.sort_unstable();

        let mut admitted = 0u32;
        for offset in offsets {
            if limiter.is_allowed_at(&id, NOW + offset).allowed {
                admitted += 1;
            }
            prop_assert!(limiter.entry(&id).unwrap().count <= max);
        }
        prop_assert!(admitted <= max);
    }

    // **Property 3: Identifier Isolation**
    // Exhausting one identifier leaves another untouched.
    #[test]
    fn prop_identifiers_isolated(
        a in identifier_strategy(),
        b in identifier_strategy(),
        max in 1u32..20
    ) {
        prop_assume!(a != b);
        let mut limiter = RateLimiter::new("test", 60_000, max);

        for _ in 0..=max {
            limiter.is_allowed_at(&a, NOW);
        }

        let decision = limiter.is_allowed_at(&b, NOW);
        prop_assert!(decision.allowed);
        prop_assert_eq!(decision.remaining, max - 1);
    }

    // **Property 4: Window Reset**
    // Once the window has passed, the next request opens a fresh one.
    #[test]
    fn prop_window_reset(
        id in identifier_strategy(),
        max in 1u32..20,
        window_ms in 1u64..120_000,
        extra in 1u64..1_000_000
    ) {
        let mut limiter = RateLimiter::new("test", window_ms, max);
        for _ in 0..=max {
            limiter.is_allowed_at(&id, NOW);
        }

        let later = NOW + window_ms + extra;
        let decision = limiter.is_allowed_at(&id, later);
        prop_assert!(decision.allowed);
        prop_assert_eq!(decision.remaining, max - 1);
        prop_assert_eq!(decision.reset_time, later + window_ms);
    }
}
