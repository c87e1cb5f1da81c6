//! Rate Limit Module
//!
//! Fixed-window admission control keyed by client identifier.

mod limiter;

#[cfg(test)]
mod property_tests;

pub use limiter::{RateLimitDecision, RateLimitEntry, RateLimiter};
