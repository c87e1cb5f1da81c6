//! Sweep Tasks
//!
//! Background tasks that periodically drop expired cache entries and
//! elapsed rate-limit windows.
//!
//! Both return a `JoinHandle`; `main` aborts them on shutdown so they never
//! hold the process open.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ResponseCache;
use crate::ratelimit::RateLimiter;

/// Spawns a background task that sweeps expired cache entries and stale
/// cache files every `interval_secs`.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(ResponseCache::new(CacheConfig::default())));
/// let sweep_handle = spawn_cache_sweep(cache.clone(), 3600);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_cache_sweep(cache: Arc<RwLock<ResponseCache>>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.write().await.cleanup_expired();

            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
        }
    })
}

/// Spawns a background task that drops elapsed windows from every limiter
/// every `interval_secs`.
pub fn spawn_rate_limit_sweep(
    limiters: Vec<Arc<Mutex<RateLimiter>>>,
    interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting rate limit sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            for limiter in &limiters {
                let mut guard = limiter.lock().await;
                let removed = guard.cleanup_expired();
                if removed > 0 {
                    debug!(
                        "Rate limit sweep: dropped {} idle clients from '{}'",
                        removed,
                        guard.name()
                    );
                }
            }
        }
    })
}
