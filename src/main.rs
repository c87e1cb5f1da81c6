//! Market Proxy - HTTP gateway for financial data
//!
//! Fronts quote, financial-statement and exchange-rate providers with
//! validation, per-client rate limiting and a TTL response cache.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use market_proxy::api::{create_router, AppState};
use market_proxy::{spawn_cache_sweep, spawn_rate_limit_sweep, Config};

/// Main entry point for the gateway.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache, rate limiters and upstream client
/// 4. Start background sweep tasks
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "market_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Market Proxy");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_enabled={}, ttl={}s, persistence={}, cache_dir={}, port={}",
        config.cache.enabled,
        config.cache.ttl_seconds,
        config.cache.persistence_enabled,
        config.cache.cache_dir.display(),
        config.server_port
    );
    info!(
        "Rate limits: window={}ms, standard={}, strict={}",
        config.rate_limit.window_ms,
        config.rate_limit.max_requests,
        config.rate_limit.strict_max_requests
    );

    let state = AppState::from_config(&config).context("failed to build upstream client")?;
    info!("Application state initialized");

    let sweep_handles = vec![
        spawn_cache_sweep(state.cache.clone(), config.cache_sweep_interval),
        spawn_rate_limit_sweep(
            vec![state.limiter.clone(), state.strict_limiter.clone()],
            config.rate_limit_sweep_interval,
        ),
    ];
    info!("Background sweep tasks started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handles))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then aborts the sweep tasks.
async fn shutdown_signal(sweep_handles: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    for handle in sweep_handles {
        handle.abort();
    }
    info!("Sweep tasks stopped");
}
