//! Validated data requests and the cache keys they map to.

use chrono::NaiveDate;

/// Which provider serves a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Quotes,
    Statements,
    ExchangeRates,
}

/// Which rate limiter guards a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitTier {
    Standard,
    /// Calls proxied to a quota-limited provider
    Strict,
}

/// Bar size for historical prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Weekly => "1wk",
            Interval::Monthly => "1mo",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "1d" => Some(Interval::Daily),
            "1wk" => Some(Interval::Weekly),
            "1mo" => Some(Interval::Monthly),
            _ => None,
        }
    }
}

/// Kind of financial statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementKind {
    #[default]
    Income,
    Balance,
    CashFlow,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Income => "income",
            StatementKind::Balance => "balance",
            StatementKind::CashFlow => "cashflow",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(StatementKind::Income),
            "balance" => Some(StatementKind::Balance),
            "cashflow" => Some(StatementKind::CashFlow),
            _ => None,
        }
    }

    /// Path segment used by the statements provider.
    pub fn endpoint(&self) -> &'static str {
        match self {
            StatementKind::Income => "income-statement",
            StatementKind::Balance => "balance-sheet-statement",
            StatementKind::CashFlow => "cash-flow-statement",
        }
    }
}

/// Reporting period of a financial statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementPeriod {
    #[default]
    Annual,
    Quarter,
}

impl StatementPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementPeriod::Annual => "annual",
            StatementPeriod::Quarter => "quarter",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "annual" => Some(StatementPeriod::Annual),
            "quarter" => Some(StatementPeriod::Quarter),
            _ => None,
        }
    }
}

/// A validated request for upstream data.
///
/// Symbols and currency codes are already upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataRequest {
    Quote {
        symbol: String,
    },
    Options {
        symbol: String,
        /// Expiration date; `None` asks for the nearest expiration
        date: Option<NaiveDate>,
    },
    Historical {
        symbol: String,
        from: NaiveDate,
        to: NaiveDate,
        interval: Interval,
    },
    Statements {
        symbol: String,
        kind: StatementKind,
        period: StatementPeriod,
    },
    ExchangeRates {
        base: String,
        /// Reference date; `None` asks for the latest rates
        date: Option<NaiveDate>,
    },
}

impl DataRequest {
    pub fn provider(&self) -> Provider {
        match self {
            DataRequest::Quote { .. }
            | DataRequest::Options { .. }
            | DataRequest::Historical { .. } => Provider::Quotes,
            DataRequest::Statements { .. } => Provider::Statements,
            DataRequest::ExchangeRates { .. } => Provider::ExchangeRates,
        }
    }

    pub fn tier(&self) -> LimitTier {
        match self.provider() {
            Provider::Statements => LimitTier::Strict,
            Provider::Quotes | Provider::ExchangeRates => LimitTier::Standard,
        }
    }

    /// Cache key identifying this request, e.g. `quote:AAPL` or
    /// `historical:MSFT:2024-01-01|2024-02-01|1d`.
    pub fn cache_key(&self) -> String {
        match self {
            DataRequest::Quote { symbol } => format!("quote:{}", symbol),
            DataRequest::Options { symbol, date } => match date {
                Some(date) => format!("options:{}:{}", symbol, date),
                None => format!("options:{}:nearest", symbol),
            },
            DataRequest::Historical {
                symbol,
                from,
                to,
                interval,
            } => format!(
                "historical:{}:{}|{}|{}",
                symbol,
                from,
                to,
                interval.as_str()
            ),
            DataRequest::Statements {
                symbol,
                kind,
                period,
            } => format!("statements:{}:{}:{}", symbol, kind.as_str(), period.as_str()),
            DataRequest::ExchangeRates { base, date } => match date {
                Some(date) => format!("fx:{}:{}", base, date),
                None => format!("fx:{}:latest", base),
            },
        }
    }

    /// Short description for logs and not-found messages.
    pub fn subject(&self) -> String {
        match self {
            DataRequest::Quote { symbol }
            | DataRequest::Options { symbol, .. }
            | DataRequest::Historical { symbol, .. }
            | DataRequest::Statements { symbol, .. } => symbol.clone(),
            DataRequest::ExchangeRates { base, .. } => base.clone(),
        }
    }
}
