//! Cache Module
//!
//! Provides a TTL-bounded response cache with optional disk persistence.

pub mod disk;
mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use stats::CacheStats;
pub use store::ResponseCache;
