//! HTTP client for the three data providers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use super::{DataRequest, DataSource, Provider};
use crate::config::UpstreamConfig;
use crate::error::UpstreamError;

const USER_AGENT: &str = concat!("market-proxy/", env!("CARGO_PKG_VERSION"));

/// Resolved upstream call: URL plus query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Endpoint {
    pub url: String,
    pub query: Vec<(&'static str, String)>,
}

/// [`DataSource`] backed by `reqwest`.
///
/// Quote-provider calls go through `quote_lock`, one at a time; the other
/// providers are called concurrently.
pub struct HttpDataSource {
    client: Client,
    config: UpstreamConfig,
    quote_lock: Mutex<()>,
}

impl HttpDataSource {
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            config,
            quote_lock: Mutex::new(()),
        })
    }

    pub(crate) fn endpoint(&self, request: &DataRequest) -> Endpoint {
        let quote = self.config.quote_url.trim_end_matches('/');
        let statements = self.config.statements_url.trim_end_matches('/');
        let fx = self.config.exchange_rate_url.trim_end_matches('/');

        match request {
            DataRequest::Quote { symbol } => Endpoint {
                url: format!("{}/quote/{}", quote, symbol),
                query: Vec::new(),
            },
            DataRequest::Options { symbol, date } => Endpoint {
                url: format!("{}/options/{}", quote, symbol),
                query: date.iter().map(|d| ("date", d.to_string())).collect(),
            },
            DataRequest::Historical {
                symbol,
                from,
                to,
                interval,
            } => Endpoint {
                url: format!("{}/historical/{}", quote, symbol),
                query: vec![
                    ("from", from.to_string()),
                    ("to", to.to_string()),
                    ("interval", interval.as_str().to_string()),
                ],
            },
            DataRequest::Statements {
                symbol,
                kind,
                period,
            } => {
                let mut query = vec![("period", period.as_str().to_string())];
                if let Some(key) = &self.config.statements_api_key {
                    query.push(("apikey", key.clone()));
                }
                Endpoint {
                    url: format!("{}/{}/{}", statements, kind.endpoint(), symbol),
                    query,
                }
            }
            DataRequest::ExchangeRates { base, date } => Endpoint {
                url: match date {
                    Some(date) => format!("{}/{}", fx, date),
                    None => format!("{}/latest", fx),
                },
                query: vec![("from", base.clone())],
            },
        }
    }

    async fn fetch_json(&self, request: &DataRequest) -> Result<Value, UpstreamError> {
        let endpoint = self.endpoint(request);

        let body = if request.provider() == Provider::Quotes {
            let _guard = self.quote_lock.lock().await;
            self.get(&endpoint, request).await?
        } else {
            self.get(&endpoint, request).await?
        };

        if request.provider() == Provider::Statements && is_empty_payload(&body) {
            return Err(UpstreamError::NotFound(request.subject()));
        }

        Ok(body)
    }

    async fn get(&self, endpoint: &Endpoint, request: &DataRequest) -> Result<Value, UpstreamError> {
        debug!("Upstream GET {}", endpoint.url);

        let response = self
            .client
            .get(&endpoint.url)
            .query(&endpoint.query)
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(UpstreamError::NotFound(request.subject())),
            status => return Err(UpstreamError::Status(status.as_u16())),
        }

        let bytes = response.bytes().await.map_err(map_transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::InvalidBody(e.to_string()))
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch(&self, request: &DataRequest) -> Result<Value, UpstreamError> {
        self.fetch_json(request).await
    }
}

fn map_transport_error(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Http(err)
    }
}

/// The statements provider answers unknown symbols with `[]` rather than 404.
fn is_empty_payload(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
