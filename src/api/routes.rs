//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_cache_handler, exchange_rates_handler, health_handler, historical_handler,
    options_handler, quote_handler, statements_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/quote/:symbol` - Real-time quote
/// - `GET /api/options/:symbol` - Option chain
/// - `GET /api/historical/:symbol` - Historical prices
/// - `GET /api/statements/:symbol` - Financial statements (strict limit)
/// - `GET /api/exchange-rates` - Central-bank reference rates
/// - `DELETE /api/cache` - Drop every cached response
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/quote/:symbol", get(quote_handler))
        .route("/api/options/:symbol", get(options_handler))
        .route("/api/historical/:symbol", get(historical_handler))
        .route("/api/statements/:symbol", get(statements_handler))
        .route("/api/exchange-rates", get(exchange_rates_handler))
        .route("/api/cache", delete(clear_cache_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
