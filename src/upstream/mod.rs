//! Upstream Module
//!
//! Describes what can be asked of the data providers and how to ask it.
//!
//! # Providers
//! - Quote provider: quotes, option chains, historical prices
//! - Statements provider: income, balance-sheet and cash-flow statements
//! - Exchange-rate feed: central-bank reference rates

mod http;
mod request;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::UpstreamError;

pub use http::HttpDataSource;
pub use request::{DataRequest, Interval, LimitTier, Provider, StatementKind, StatementPeriod};

/// Something that can answer a [`DataRequest`] with a JSON payload.
///
/// Handlers only see this trait, so tests can swap the HTTP client for an
/// in-memory source.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, request: &DataRequest) -> Result<Value, UpstreamError>;
}
