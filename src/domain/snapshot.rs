use crate::domain::{feed::*, quotes::*, settlement::*, spread::*, types::*};
use rust_decimal::Decimal;
use serde::Serialize;

/// Display-ready block for one exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteGroup {
    /// Contracts, nearest maturity first
    pub ladder: FuturesLadder,
    /// Adjacent-contract spreads
    pub spreads: Vec<SpreadRecord>,
    /// Trend of the most recently updated quote
    pub trend: Trend,
    /// Back contract against front contract, when there are two or more
    pub curve: Option<CurveStructure>,
}

impl QuoteGroup {
    /// Derives spreads, trend and curve structure for a ladder
    pub fn from_ladder(ladder: FuturesLadder) -> Self {
        let spreads = ladder_spreads(&ladder);
        let curve = curve_structure(&ladder);

        // max_by_key keeps the last of equal keys, so scan back to front to
        // prefer the nearer contract on ties
        let trend = ladder
            .quotes()
            .iter()
            .rev()
            .max_by_key(|q| q.timestamp)
            .map(|q| q.trend)
            .unwrap_or(Trend::Neutral);

        Self {
            ladder,
            spreads,
            trend,
            curve,
        }
    }
}

/// Aggregated market state handed to presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketView {
    /// When the source produced the underlying snapshot
    pub as_of: Timestamp,
    /// LME block
    pub lme: Option<QuoteGroup>,
    /// MCX block
    pub mcx: Option<QuoteGroup>,
    /// SHFE block
    pub shfe: Option<QuoteGroup>,
    /// Monthly average cash settlement
    pub avg_csp: Option<CashSettlement>,
    /// Daily cash settlements, newest first
    pub csp_history: CashSettlementHistory,
    /// Supplier list prices
    pub suppliers: Vec<SupplierQuote>,
    /// FX reference rates with classified trends
    pub fx_rates: Vec<FxRate>,
}

impl MarketView {
    /// Block for one exchange
    pub fn group(&self, exchange: Exchange) -> Option<&QuoteGroup> {
        match exchange {
            Exchange::Lme => self.lme.as_ref(),
            Exchange::Mcx => self.mcx.as_ref(),
            Exchange::Shfe => self.shfe.as_ref(),
        }
    }

    /// Nearest-contract price for one exchange
    pub fn front_month(&self, exchange: Exchange) -> Option<Decimal> {
        self.group(exchange).map(|g| g.ladder.front().price)
    }

    /// FX rate by name
    pub fn fx_rate(&self, pair_name: &str) -> Option<&FxRate> {
        self.fx_rates.iter().find(|r| r.pair_name == pair_name)
    }

    /// MCX front month minus LME spot at import parity, INR/kg
    pub fn import_parity_gap(&self, fx_pair: &str) -> Option<Decimal> {
        let mcx = self.front_month(Exchange::Mcx)?;
        let lme = self.front_month(Exchange::Lme)?;
        let fx = self.fx_rate(fx_pair)?;
        Some(compute_arbitrage_magnitude(mcx, lme, fx.rate))
    }

    /// Day-over-day cash settlement changes with the INR leg at `fx_pair`
    pub fn settlement_changes(&self, fx_pair: &str) -> Option<Vec<SettlementChange>> {
        let fx = self.fx_rate(fx_pair)?;
        Some(self.csp_history.changes(fx.rate))
    }
}

/// Turns a raw [`MarketSnapshot`] into a [`MarketView`].
///
/// Stateless; run once per refresh.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotAggregator;

impl SnapshotAggregator {
    /// Creates a new aggregator
    pub fn new() -> Self {
        Self
    }

    /// Aggregates one snapshot.
    ///
    /// Fails with `InvalidInput` when an exchange block carries quotes in a
    /// currency other than the exchange's own, or when the cash settlement
    /// history lists a date twice.
    pub fn aggregate(&self, snapshot: &MarketSnapshot) -> MonitorResult<MarketView> {
        Ok(MarketView {
            as_of: snapshot.as_of,
            lme: self.group(snapshot, Exchange::Lme)?,
            mcx: self.group(snapshot, Exchange::Mcx)?,
            shfe: self.group(snapshot, Exchange::Shfe)?,
            avg_csp: snapshot.avg_csp.clone(),
            csp_history: CashSettlementHistory::new(snapshot.csp_history.clone())?,
            suppliers: snapshot.suppliers.clone(),
            fx_rates: snapshot
                .fx_rates
                .iter()
                .map(|u| FxRate::new(u.pair_name.clone(), u.rate, u.change_percent, u.updated))
                .collect(),
        })
    }

    fn group(
        &self,
        snapshot: &MarketSnapshot,
        exchange: Exchange,
    ) -> MonitorResult<Option<QuoteGroup>> {
        let updates = snapshot.quotes_for(exchange);
        if updates.is_empty() {
            return Ok(None);
        }

        let expected = exchange.quote_currency();
        let mut quotes = Vec::with_capacity(updates.len());
        for update in updates {
            if update.currency != expected {
                return Err(MonitorError::invalid(format!(
                    "{} quote {} is in {}, expected {}",
                    exchange, update.label, update.currency, expected
                )));
            }
            quotes.push(Quote::new(
                update.label.clone(),
                update.price,
                update.currency,
                update.timestamp,
                update.change_percent,
            ));
        }

        let ladder = FuturesLadder::new(exchange, quotes)?;
        Ok(Some(QuoteGroup::from_ladder(ladder)))
    }
}
