//! Market Proxy - HTTP gateway for financial data
//!
//! Fronts a quote provider, a financial-statements provider and a
//! central-bank exchange-rate feed with validation, per-client rate limiting
//! and a TTL response cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod ratelimit;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use tasks::{spawn_cache_sweep, spawn_rate_limit_sweep};
