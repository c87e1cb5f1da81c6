//! API Module
//!
//! HTTP handlers and routing for the gateway REST API.
//!
//! # Endpoints
//! - `GET /api/quote/:symbol` - Real-time quote
//! - `GET /api/options/:symbol` - Option chain
//! - `GET /api/historical/:symbol` - Historical prices
//! - `GET /api/statements/:symbol` - Financial statements
//! - `GET /api/exchange-rates` - Exchange rates
//! - `DELETE /api/cache` - Clear the response cache
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
