use crate::domain::types::*;
use chrono::SecondsFormat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A priced instrument at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Instrument label, e.g. "FEB 2026" or "LME SPOT"
    pub label: String,
    /// Quoted price in `currency`
    pub price: Decimal,
    /// Quote currency
    pub currency: Currency,
    /// When the quote was last updated
    pub timestamp: Timestamp,
    /// Percentage change the trend was classified from
    pub change_percent: Decimal,
    /// Direction of the latest move
    pub trend: Trend,
}

impl Quote {
    /// Creates a quote, classifying its trend from `change_percent`
    pub fn new(
        label: impl Into<String>,
        price: Decimal,
        currency: Currency,
        timestamp: Timestamp,
        change_percent: Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            price,
            currency,
            timestamp,
            change_percent,
            trend: Trend::from_change(change_percent),
        }
    }

    /// Timestamp as an ISO-8601 string
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Futures contracts of one exchange, nearest maturity first.
///
/// Never empty, and every quote shares the ladder's currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuturesLadder {
    exchange: Exchange,
    quotes: Vec<Quote>,
}

impl FuturesLadder {
    /// Builds a ladder from quotes already ordered by increasing maturity
    pub fn new(exchange: Exchange, quotes: Vec<Quote>) -> MonitorResult<Self> {
        let Some(front) = quotes.first() else {
            return Err(MonitorError::invalid(format!(
                "{} ladder has no quotes",
                exchange
            )));
        };

        let currency = front.currency;
        if let Some(stray) = quotes.iter().find(|q| q.currency != currency) {
            return Err(MonitorError::invalid(format!(
                "{} ladder mixes {} and {} quotes ({})",
                exchange, currency, stray.currency, stray.label
            )));
        }

        Ok(Self { exchange, quotes })
    }

    /// Exchange the ladder is quoted on
    pub fn exchange(&self) -> Exchange {
        self.exchange
    }

    /// Quotes, nearest maturity first
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Number of contracts on the ladder
    pub fn contract_count(&self) -> usize {
        self.quotes.len()
    }

    /// Nearest contract
    pub fn front(&self) -> &Quote {
        &self.quotes[0]
    }

    /// Furthest contract
    pub fn back(&self) -> &Quote {
        &self.quotes[self.quotes.len() - 1]
    }

    /// Currency shared by every quote on the ladder
    pub fn currency(&self) -> Currency {
        self.front().currency
    }
}

/// Supplier list price for a grade of primary aluminium
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierQuote {
    /// Supplier name, e.g. "Hindalco"
    pub supplier_name: String,
    /// Price per metric ton in INR
    pub price_per_mt: Decimal,
    /// Product grade, e.g. "Aluminium Ingot P1020"
    pub grade: String,
    /// When the supplier last revised the price
    pub last_updated: Timestamp,
    /// Percentage change since the previous list price
    pub change_percent: Decimal,
}

impl SupplierQuote {
    /// Per-kilogram base price
    pub fn price_per_kg(&self) -> Decimal {
        self.price_per_mt / KG_PER_METRIC_TON
    }

    /// Last update as an ISO-8601 string
    pub fn last_updated_iso(&self) -> String {
        self.last_updated.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Reference exchange rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxRate {
    /// Rate name, e.g. "USD/INR Live" or "RBI Reference Rate"
    pub pair_name: String,
    /// Quote currency units per base currency unit
    pub rate: Decimal,
    /// Percentage change the trend was classified from
    pub change_percent: Decimal,
    /// Direction of the latest move
    pub trend: Trend,
    /// When the rate was published
    pub updated: Timestamp,
}

impl FxRate {
    /// Creates a rate, classifying its trend from `change_percent`
    pub fn new(
        pair_name: impl Into<String>,
        rate: Decimal,
        change_percent: Decimal,
        updated: Timestamp,
    ) -> Self {
        Self {
            pair_name: pair_name.into(),
            rate,
            change_percent,
            trend: Trend::from_change(change_percent),
            updated,
        }
    }
}

/// Monthly average cash settlement price (CSP)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashSettlement {
    /// Average settlement price
    pub price: Decimal,
    /// Settlement currency
    pub currency: Currency,
    /// Averaging period, e.g. "Jan 2026"
    pub period: String,
}
