//! Error types for the gateway
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ratelimit::RateLimitDecision;

// == Persist Error ==
/// Failure while reading or writing an on-disk cache entry.
///
/// Never leaves the cache module: callers log it and treat it as a miss.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// == Upstream Error ==
/// Failure while talking to one of the data providers.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Transport-level failure (connect, TLS, body read)
    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider did not answer within the configured timeout
    #[error("Upstream request timed out")]
    Timeout,

    /// The provider answered with a non-success status
    #[error("Upstream returned status {0}")]
    Status(u16),

    /// The provider has no data for the requested resource
    #[error("Not found: {0}")]
    NotFound(String),

    /// The provider answered with something that is not usable JSON
    #[error("Invalid upstream response: {0}")]
    InvalidBody(String),
}

// == API Error Enum ==
/// Unified error type for HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Requested resource does not exist upstream
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client exhausted its request window
    #[error("Too many requests, retry after {retry_after_secs}s")]
    RateLimited {
        decision: RateLimitDecision,
        retry_after_secs: u64,
    },

    /// Upstream provider failed
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Upstream provider timed out
    #[error("Upstream timeout")]
    UpstreamTimeout,
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotFound(what) => ApiError::NotFound(what),
            UpstreamError::Timeout => ApiError::UpstreamTimeout,
            UpstreamError::Http(e) if e.is_timeout() => ApiError::UpstreamTimeout,
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
        };

        let body = Json(json!({
            "error": message
        }));

        let mut headers = HeaderMap::new();
        if let ApiError::RateLimited {
            decision,
            retry_after_secs,
        } = &self
        {
            decision.write_headers(&mut headers);
            headers.insert("retry-after", HeaderValue::from(*retry_after_secs));
        }

        (status, headers, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
