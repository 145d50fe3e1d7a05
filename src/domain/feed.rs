use crate::domain::{quotes::*, types::*};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw exchange quote as delivered by a market-data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteUpdate {
    /// Instrument label
    pub label: String,
    /// Quoted price
    pub price: Decimal,
    /// Quote currency
    pub currency: Currency,
    /// Percentage change since the previous settlement
    pub change_percent: Decimal,
    /// When the quote was published
    pub timestamp: Timestamp,
}

impl QuoteUpdate {
    /// Creates a new quote update
    pub fn new(
        label: impl Into<String>,
        price: Decimal,
        currency: Currency,
        change_percent: Decimal,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            label: label.into(),
            price,
            currency,
            change_percent,
            timestamp,
        }
    }
}

/// Raw FX reference rate as delivered by a market-data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxUpdate {
    /// Rate name
    pub pair_name: String,
    /// Rate value
    pub rate: Decimal,
    /// Percentage change since the previous fixing
    pub change_percent: Decimal,
    /// When the rate was published
    pub updated: Timestamp,
}

/// One day's LME official cash settlement price, USD/MT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashSettlementDay {
    /// Settlement date
    pub date: NaiveDate,
    /// Settlement price
    pub price: Decimal,
}

/// Everything one refresh of the market-data source delivers.
///
/// Futures quotes are listed nearest maturity first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// When the source produced the snapshot
    pub as_of: Timestamp,
    /// LME spot and forward quotes
    pub lme: Vec<QuoteUpdate>,
    /// MCX futures quotes
    pub mcx: Vec<QuoteUpdate>,
    /// SHFE futures quotes
    pub shfe: Vec<QuoteUpdate>,
    /// Monthly average LME cash settlement, when published
    pub avg_csp: Option<CashSettlement>,
    /// Daily cash settlements, any order
    pub csp_history: Vec<CashSettlementDay>,
    /// Domestic supplier list prices
    pub suppliers: Vec<SupplierQuote>,
    /// FX reference rates
    pub fx_rates: Vec<FxUpdate>,
}

impl MarketSnapshot {
    /// Creates an empty snapshot
    pub fn new(as_of: Timestamp) -> Self {
        Self {
            as_of,
            lme: Vec::new(),
            mcx: Vec::new(),
            shfe: Vec::new(),
            avg_csp: None,
            csp_history: Vec::new(),
            suppliers: Vec::new(),
            fx_rates: Vec::new(),
        }
    }

    /// Quotes delivered for one exchange
    pub fn quotes_for(&self, exchange: Exchange) -> &[QuoteUpdate] {
        match exchange {
            Exchange::Lme => &self.lme,
            Exchange::Mcx => &self.mcx,
            Exchange::Shfe => &self.shfe,
        }
    }
}
