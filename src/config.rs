//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Response cache settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Master switch; when off every read misses and writes are dropped
    pub enabled: bool,
    /// Entry lifetime in seconds
    pub ttl_seconds: u64,
    /// Mirror every write to `cache_dir`
    pub persistence_enabled: bool,
    /// Directory holding one JSON file per cached key
    pub cache_dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: 86_400,
            persistence_enabled: false,
            cache_dir: default_cache_dir(),
        }
    }
}

/// Fixed-window limiter settings shared by the standard and strict limiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Window length in milliseconds
    pub window_ms: u64,
    /// Requests per window for ordinary endpoints
    pub max_requests: u32,
    /// Requests per window for endpoints backed by a quota-limited provider
    pub strict_max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            max_requests: 100,
            strict_max_requests: 20,
        }
    }
}

/// Data provider endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// Base URL of the quote / options / historical provider
    pub quote_url: String,
    /// Base URL of the financial-statements provider
    pub statements_url: String,
    /// API key appended to statements requests, if any
    pub statements_api_key: Option<String>,
    /// Base URL of the central-bank exchange-rate feed
    pub exchange_rate_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            quote_url: "http://localhost:8081".to_string(),
            statements_url: "https://financialmodelingprep.com/api/v3".to_string(),
            statements_api_key: None,
            exchange_rate_url: "https://api.frankfurter.app".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Response cache
    pub cache: CacheConfig,
    /// Interval in seconds between cache sweeps
    pub cache_sweep_interval: u64,
    /// Rate limiting
    pub rate_limit: RateLimitConfig,
    /// Interval in seconds between rate-limit sweeps
    pub rate_limit_sweep_interval: u64,
    /// Data providers
    pub upstream: UpstreamConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_ENABLED` - Enable the response cache (default: true)
    /// - `CACHE_TTL_SECONDS` - Entry lifetime (default: 86400)
    /// - `CACHE_PERSISTENCE_ENABLED` - Write entries to disk (default: false)
    /// - `CACHE_DIR` - Cache directory (default: `./.cache`)
    /// - `CACHE_SWEEP_INTERVAL_SECS` - Cache sweep frequency (default: 3600)
    /// - `RATE_LIMIT_WINDOW_MS` - Window length (default: 60000)
    /// - `RATE_LIMIT_MAX_REQUESTS` - Standard limit (default: 100)
    /// - `STRICT_RATE_LIMIT_MAX_REQUESTS` - Strict limit (default: 20)
    /// - `RATE_LIMIT_SWEEP_INTERVAL_SECS` - Limiter sweep frequency (default: 60)
    /// - `QUOTE_API_URL`, `STATEMENTS_API_URL`, `STATEMENTS_API_KEY`,
    ///   `EXCHANGE_RATE_API_URL`, `UPSTREAM_TIMEOUT_SECS` - Data providers
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache: CacheConfig {
                enabled: bool_var("CACHE_ENABLED").unwrap_or(defaults.cache.enabled),
                ttl_seconds: parse_var("CACHE_TTL_SECONDS").unwrap_or(defaults.cache.ttl_seconds),
                persistence_enabled: bool_var("CACHE_PERSISTENCE_ENABLED")
                    .unwrap_or(defaults.cache.persistence_enabled),
                cache_dir: env::var("CACHE_DIR")
                    .ok()
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from)
                    .unwrap_or(defaults.cache.cache_dir),
            },
            cache_sweep_interval: parse_var("CACHE_SWEEP_INTERVAL_SECS")
                .unwrap_or(defaults.cache_sweep_interval),
            rate_limit: RateLimitConfig {
                window_ms: parse_var("RATE_LIMIT_WINDOW_MS")
                    .unwrap_or(defaults.rate_limit.window_ms),
                max_requests: parse_var("RATE_LIMIT_MAX_REQUESTS")
                    .unwrap_or(defaults.rate_limit.max_requests),
                strict_max_requests: parse_var("STRICT_RATE_LIMIT_MAX_REQUESTS")
                    .unwrap_or(defaults.rate_limit.strict_max_requests),
            },
            rate_limit_sweep_interval: parse_var("RATE_LIMIT_SWEEP_INTERVAL_SECS")
                .unwrap_or(defaults.rate_limit_sweep_interval),
            upstream: UpstreamConfig {
                quote_url: env::var("QUOTE_API_URL").unwrap_or(defaults.upstream.quote_url),
                statements_url: env::var("STATEMENTS_API_URL")
                    .unwrap_or(defaults.upstream.statements_url),
                statements_api_key: env::var("STATEMENTS_API_KEY")
                    .ok()
                    .filter(|v| !v.is_empty()),
                exchange_rate_url: env::var("EXCHANGE_RATE_API_URL")
                    .unwrap_or(defaults.upstream.exchange_rate_url),
                timeout_secs: parse_var("UPSTREAM_TIMEOUT_SECS")
                    .unwrap_or(defaults.upstream.timeout_secs),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache: CacheConfig::default(),
            cache_sweep_interval: 3600,
            rate_limit: RateLimitConfig::default(),
            rate_limit_sweep_interval: 60,
            upstream: UpstreamConfig::default(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".cache")
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn bool_var(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|v| parse_bool(&v))
}

/// Accepts the usual spellings of a boolean flag.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cache_sweep_interval, 3600);
        assert_eq!(config.rate_limit_sweep_interval, 60);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_seconds, 86_400);
        assert!(!config.cache.persistence_enabled);
        assert!(config.cache.cache_dir.ends_with(".cache"));
        assert_eq!(config.rate_limit.window_ms, 60_000);
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.strict_max_requests, 20);
        assert_eq!(config.upstream.timeout_secs, 10);
        assert!(config.upstream.statements_api_key.is_none());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" ON "), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("False"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("CACHE_TTL_SECONDS", "120");
        env::set_var("CACHE_PERSISTENCE_ENABLED", "yes");
        env::set_var("STRICT_RATE_LIMIT_MAX_REQUESTS", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.cache.ttl_seconds, 120);
        assert!(config.cache.persistence_enabled);
        assert_eq!(config.rate_limit.strict_max_requests, 20);

        env::remove_var("CACHE_TTL_SECONDS");
        env::remove_var("CACHE_PERSISTENCE_ENABLED");
        env::remove_var("STRICT_RATE_LIMIT_MAX_REQUESTS");
    }
}
