//! Request and Response models for the gateway API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! deserializing query strings and serializing the gateway's own response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    normalize_symbol, quote_request, ExchangeRatesQuery, HistoricalQuery, OptionsQuery,
    StatementsQuery,
};
pub use responses::{ClearResponse, HealthResponse, RateLimitClients, StatsResponse};
