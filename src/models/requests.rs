//! Request DTOs for the gateway API
//!
//! Query-string shapes accepted by each endpoint, and their validation into
//! a [`DataRequest`].

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::upstream::{DataRequest, Interval, StatementKind, StatementPeriod};

/// Maximum accepted ticker length
pub const MAX_SYMBOL_LENGTH: usize = 12;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Query for `GET /api/options/:symbol`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionsQuery {
    /// Expiration date (`YYYY-MM-DD`), nearest expiration when absent
    #[serde(default)]
    pub date: Option<String>,
}

/// Query for `GET /api/historical/:symbol`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoricalQuery {
    /// First day of the range (required)
    #[serde(default)]
    pub from: Option<String>,
    /// Last day of the range, today when absent
    #[serde(default)]
    pub to: Option<String>,
    /// `1d`, `1wk` or `1mo`
    #[serde(default)]
    pub interval: Option<String>,
}

/// Query for `GET /api/statements/:symbol`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatementsQuery {
    /// `income`, `balance` or `cashflow`
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// `annual` or `quarter`
    #[serde(default)]
    pub period: Option<String>,
}

/// Query for `GET /api/exchange-rates`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExchangeRatesQuery {
    /// ISO 4217 base currency, `EUR` when absent
    #[serde(default)]
    pub base: Option<String>,
    /// Reference date, latest when absent
    #[serde(default)]
    pub date: Option<String>,
}

/// Validates a ticker and upper-cases it.
pub fn normalize_symbol(raw: &str) -> Result<String, String> {
    let symbol = raw.trim();
    if symbol.is_empty() {
        return Err("Symbol cannot be empty".to_string());
    }
    if symbol.len() > MAX_SYMBOL_LENGTH {
        return Err(format!(
            "Symbol exceeds maximum length of {} characters",
            MAX_SYMBOL_LENGTH
        ));
    }
    if !symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-'))
    {
        return Err(format!("Invalid symbol: {}", symbol));
    }
    Ok(symbol.to_ascii_uppercase())
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| format!("Invalid {}: expected YYYY-MM-DD, got '{}'", field, raw))
}

fn parse_optional_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_date(field, raw).map(Some),
        None => Ok(None),
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Builds a quote request.
pub fn quote_request(symbol: &str) -> Result<DataRequest, String> {
    Ok(DataRequest::Quote {
        symbol: normalize_symbol(symbol)?,
    })
}

impl OptionsQuery {
    pub fn validate(&self, symbol: &str) -> Result<DataRequest, String> {
        Ok(DataRequest::Options {
            symbol: normalize_symbol(symbol)?,
            date: parse_optional_date("date", self.date.as_deref())?,
        })
    }
}

impl HistoricalQuery {
    pub fn validate(&self, symbol: &str) -> Result<DataRequest, String> {
        let symbol = normalize_symbol(symbol)?;
        let from = match self.from.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_date("from", raw)?,
            None => return Err("Missing required parameter: from".to_string()),
        };
        let to = parse_optional_date("to", self.to.as_deref())?.unwrap_or_else(today);
        if from > to {
            return Err(format!("Invalid range: from {} is after to {}", from, to));
        }
        let interval = match self.interval.as_deref() {
            Some(raw) => Interval::parse(raw)
                .ok_or_else(|| format!("Invalid interval '{}': expected 1d, 1wk or 1mo", raw))?,
            None => Interval::default(),
        };

        Ok(DataRequest::Historical {
            symbol,
            from,
            to,
            interval,
        })
    }
}

impl StatementsQuery {
    pub fn validate(&self, symbol: &str) -> Result<DataRequest, String> {
        let symbol = normalize_symbol(symbol)?;
        let kind = match self.kind.as_deref() {
            Some(raw) => StatementKind::parse(raw).ok_or_else(|| {
                format!("Invalid type '{}': expected income, balance or cashflow", raw)
            })?,
            None => StatementKind::default(),
        };
        let period = match self.period.as_deref() {
            Some(raw) => StatementPeriod::parse(raw)
                .ok_or_else(|| format!("Invalid period '{}': expected annual or quarter", raw))?,
            None => StatementPeriod::default(),
        };

        Ok(DataRequest::Statements {
            symbol,
            kind,
            period,
        })
    }
}

impl ExchangeRatesQuery {
    pub fn validate(&self) -> Result<DataRequest, String> {
        let base = match self.base.as_deref().map(str::trim) {
            None | Some("") => "EUR".to_string(),
            Some(raw) if raw.len() == 3 && raw.chars().all(|c| c.is_ascii_alphabetic()) => {
                raw.to_ascii_uppercase()
            }
            Some(raw) => return Err(format!("Invalid base currency: {}", raw)),
        };
        let date = parse_optional_date("date", self.date.as_deref())?;
        if let Some(date) = date {
            if date > today() {
                return Err(format!("Invalid date: {} is in the future", date));
            }
        }

        Ok(DataRequest::ExchangeRates { base, date })
    }
}
