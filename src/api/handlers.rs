//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.
//!
//! Data endpoints share one pipeline: validate input, check the rate limit,
//! check the cache, call the provider on a miss, store the result, and answer
//! with `X-Cache` and `X-RateLimit-*` headers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::cache::{current_timestamp_ms, ResponseCache};
use crate::config::Config;
use crate::error::{ApiError, Result, UpstreamError};
use crate::models::{
    quote_request, ClearResponse, ExchangeRatesQuery, HealthResponse, HistoricalQuery,
    OptionsQuery, StatementsQuery, StatsResponse,
};
use crate::ratelimit::RateLimiter;
use crate::upstream::{DataRequest, DataSource, HttpDataSource, LimitTier};

/// Identifier used when a request carries no client address
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Application state shared across all handlers.
///
/// Everything is constructed explicitly and injected through axum's `State`.
#[derive(Clone)]
pub struct AppState {
    /// Response cache
    pub cache: Arc<RwLock<ResponseCache>>,
    /// Limiter for ordinary endpoints
    pub limiter: Arc<Mutex<RateLimiter>>,
    /// Limiter for endpoints backed by a quota-limited provider
    pub strict_limiter: Arc<Mutex<RateLimiter>>,
    /// Data providers
    pub source: Arc<dyn DataSource>,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(
        cache: ResponseCache,
        limiter: RateLimiter,
        strict_limiter: RateLimiter,
        source: Arc<dyn DataSource>,
    ) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            limiter: Arc::new(Mutex::new(limiter)),
            strict_limiter: Arc::new(Mutex::new(strict_limiter)),
            source,
        }
    }

    /// Creates a new AppState from configuration, talking to the real providers.
    pub fn from_config(config: &Config) -> std::result::Result<Self, UpstreamError> {
        let source = HttpDataSource::new(config.upstream.clone())?;
        let window_ms = config.rate_limit.window_ms;

        Ok(Self::new(
            ResponseCache::new(config.cache.clone()),
            RateLimiter::new("standard", window_ms, config.rate_limit.max_requests),
            RateLimiter::new("strict", window_ms, config.rate_limit.strict_max_requests),
            Arc::new(source),
        ))
    }

    /// Picks the limiter guarding a given tier.
    pub fn limiter_for(&self, tier: LimitTier) -> &Arc<Mutex<RateLimiter>> {
        match tier {
            LimitTier::Standard => &self.limiter,
            LimitTier::Strict => &self.strict_limiter,
        }
    }
}

/// Extracts the client identifier: first `X-Forwarded-For` hop, then
/// `X-Real-IP`, then [`UNKNOWN_CLIENT`].
pub fn client_identifier(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim);
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim);

    forwarded
        .filter(|s| !s.is_empty())
        .or(real_ip.filter(|s| !s.is_empty()))
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

/// Runs a validated request through rate limiting, cache and provider.
async fn serve(state: &AppState, headers: &HeaderMap, request: DataRequest) -> Result<Response> {
    let client = client_identifier(headers);
    let tier = request.tier();

    let decision = state.limiter_for(tier).lock().await.is_allowed(&client);
    if !decision.allowed {
        debug!("Rate limit exceeded for {} on {:?} tier", client, tier);
        return Err(ApiError::RateLimited {
            retry_after_secs: decision.retry_after_secs(current_timestamp_ms()),
            decision,
        });
    }

    let key = request.cache_key();
    let cached = state.cache.write().await.get(&key);

    let (data, cache_status) = match cached {
        Some(data) => (data, "HIT"),
        None => {
            let data = state.source.fetch(&request).await?;
            state.cache.write().await.set(key, data.clone());
            (data, "MISS")
        }
    };

    let mut response_headers = HeaderMap::new();
    decision.write_headers(&mut response_headers);
    response_headers.insert("x-cache", HeaderValue::from_static(cache_status));

    Ok((response_headers, Json(data)).into_response())
}

/// Handler for GET /api/quote/:symbol
pub async fn quote_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let request = quote_request(&symbol).map_err(ApiError::InvalidRequest)?;
    serve(&state, &headers, request).await
}

/// Handler for GET /api/options/:symbol
pub async fn options_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<OptionsQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let request = query.validate(&symbol).map_err(ApiError::InvalidRequest)?;
    serve(&state, &headers, request).await
}

/// Handler for GET /api/historical/:symbol
pub async fn historical_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<HistoricalQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let request = query.validate(&symbol).map_err(ApiError::InvalidRequest)?;
    serve(&state, &headers, request).await
}

/// Handler for GET /api/statements/:symbol
///
/// Guarded by the strict limiter.
pub async fn statements_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<StatementsQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let request = query.validate(&symbol).map_err(ApiError::InvalidRequest)?;
    serve(&state, &headers, request).await
}

/// Handler for GET /api/exchange-rates
pub async fn exchange_rates_handler(
    State(state): State<AppState>,
    Query(query): Query<ExchangeRatesQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let request = query.validate().map_err(ApiError::InvalidRequest)?;
    serve(&state, &headers, request).await
}

/// Handler for DELETE /api/cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let cleared = state.cache.write().await.clear();
    info!("Cache cleared on request: {} entries", cleared);
    Json(ClearResponse::new(cleared))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.read().await.stats();
    let standard = state.limiter.lock().await.len();
    let strict = state.strict_limiter.lock().await.len();

    Json(StatsResponse::new(&stats, standard, strict))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
