use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kilograms per metric ton.
///
/// Every conversion between per-MT exchange quotes (LME, supplier lists) and
/// per-kg domestic prices goes through this constant.
pub const KG_PER_METRIC_TON: Decimal = Decimal::ONE_THOUSAND;

/// Quote currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// US dollar (LME)
    Usd,
    /// Indian rupee (MCX, domestic suppliers)
    Inr,
    /// Chinese yuan (SHFE)
    Cny,
}

impl Currency {
    /// Display symbol used by the feed and the dashboard
    pub fn symbol(&self) -> char {
        match self {
            Currency::Usd => '$',
            Currency::Inr => '₹',
            Currency::Cny => '¥',
        }
    }

    /// Resolves a currency from its display symbol
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '$' => Some(Currency::Usd),
            '₹' => Some(Currency::Inr),
            '¥' => Some(Currency::Cny),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Usd => write!(f, "USD"),
            Currency::Inr => write!(f, "INR"),
            Currency::Cny => write!(f, "CNY"),
        }
    }
}

/// Exchange a futures ladder is quoted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    /// London Metal Exchange
    Lme,
    /// Multi Commodity Exchange (India)
    Mcx,
    /// Shanghai Futures Exchange
    Shfe,
}

impl Exchange {
    /// Currency the exchange quotes aluminium in
    pub fn quote_currency(&self) -> Currency {
        match self {
            Exchange::Lme => Currency::Usd,
            Exchange::Mcx => Currency::Inr,
            Exchange::Shfe => Currency::Cny,
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exchange::Lme => write!(f, "LME"),
            Exchange::Mcx => write!(f, "MCX"),
            Exchange::Shfe => write!(f, "SHFE"),
        }
    }
}

/// Direction of the latest price move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    /// Positive change
    Up,
    /// Negative change
    Down,
    /// No change
    Neutral,
}

impl Trend {
    /// Classifies a percentage change by its sign.
    ///
    /// Zero is `Neutral`. This is deliberately not the contango rule in
    /// [`crate::domain::spread::CurveStructure::from_delta`], where zero counts
    /// as contango.
    pub fn from_change(change_percent: Decimal) -> Self {
        if change_percent > Decimal::ZERO {
            Trend::Up
        } else if change_percent < Decimal::ZERO {
            Trend::Down
        } else {
            Trend::Neutral
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "UP"),
            Trend::Down => write!(f, "DOWN"),
            Trend::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Timestamp for quotes and snapshots
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Market monitor errors
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Missing or non-numeric quote field, or invalid calculator input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input/output error reading a feed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed feed document
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Poisoned board lock
    #[error("Lock error: {0}")]
    LockError(String),
}

impl MonitorError {
    /// Shorthand for an [`MonitorError::InvalidInput`]
    pub fn invalid(msg: impl Into<String>) -> Self {
        MonitorError::InvalidInput(msg.into())
    }
}

/// Result type for market monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Parses user or feed text into a decimal.
///
/// Surrounding whitespace and a leading sign are accepted. Anything else
/// besides ASCII digits and a single `.` is rejected, so empty or
/// non-numeric text is an error, never zero.
pub fn parse_decimal(field: &str, text: &str) -> MonitorResult<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(MonitorError::invalid(format!("{} is missing", field)));
    }

    let (negative, magnitude) = match trimmed.as_bytes()[0] {
        b'+' => (false, &trimmed[1..]),
        b'-' => (true, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let well_formed = magnitude.bytes().any(|b| b.is_ascii_digit())
        && magnitude.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && magnitude.bytes().filter(|&b| b == b'.').count() <= 1;
    if !well_formed {
        return Err(MonitorError::invalid(format!(
            "{} '{}' is not a number",
            field, text
        )));
    }

    let value = Decimal::from_str(magnitude)
        .map_err(|e| MonitorError::invalid(format!("{} '{}' is not a number: {}", field, text, e)))?;
    Ok(if negative { -value } else { value })
}
