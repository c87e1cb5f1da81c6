//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache sweep: removes expired entries and stale cache files (hourly by default)
//! - Rate limit sweep: drops elapsed client windows (every minute by default)

mod cleanup;

pub use cleanup::{spawn_cache_sweep, spawn_rate_limit_sweep};
