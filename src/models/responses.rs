//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies that the gateway
//! produces itself. Upstream payloads are passed through untouched.

use serde::Serialize;

use crate::cache::CacheStats;

/// Number of clients each limiter is tracking
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitClients {
    pub standard: usize,
    pub strict: usize,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Hits served by rehydrating a disk entry
    pub disk_loads: u64,
    /// Entries dropped after their TTL elapsed
    pub expirations: u64,
    /// Current number of entries in memory
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Clients tracked by the rate limiters
    pub rate_limit_clients: RateLimitClients,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics and limiter sizes
    pub fn new(stats: &CacheStats, standard: usize, strict: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            disk_loads: stats.disk_loads,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            rate_limit_clients: RateLimitClients { standard, strict },
        }
    }
}

/// Response body for DELETE /api/cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// In-memory entries dropped
    pub cleared: usize,
}

impl ClearResponse {
    pub fn new(cleared: usize) -> Self {
        Self {
            message: format!("Cache cleared ({} entries)", cleared),
            cleared,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
