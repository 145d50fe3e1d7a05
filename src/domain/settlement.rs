use crate::domain::{feed::CashSettlementDay, spread::*, types::*};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Day-over-day move of the LME cash settlement price
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementChange {
    /// Settlement date
    pub date: NaiveDate,
    /// Settlement price, USD/MT
    pub price: Decimal,
    /// Price over the previous settlement
    pub usd_change: SpreadResult,
    /// Change as a percentage of the previous settlement; `None` when that was zero
    pub percent_change: Option<Decimal>,
    /// USD change converted to INR/kg
    pub inr_change_per_kg: Decimal,
    /// Direction of the move
    pub trend: Trend,
}

impl SettlementChange {
    /// INR change per metric ton, the unit the dashboard lists
    pub fn inr_change_per_mt(&self) -> Decimal {
        self.inr_change_per_kg * KG_PER_METRIC_TON
    }

    /// USD change as `+$12.20`, `-$5.40` or `$0.00`
    pub fn display_usd_change(&self) -> String {
        let magnitude = round_for_display(self.usd_change.delta.abs());
        match self.trend {
            Trend::Up => format!("+${:.2}", magnitude),
            Trend::Down => format!("-${:.2}", magnitude),
            Trend::Neutral => format!("${:.2}", magnitude),
        }
    }
}

/// Daily cash settlement prices, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CashSettlementHistory {
    days: Vec<CashSettlementDay>,
}

impl CashSettlementHistory {
    /// Orders the days newest first. A date listed twice is rejected.
    pub fn new(mut days: Vec<CashSettlementDay>) -> MonitorResult<Self> {
        days.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(pair) = days.windows(2).find(|pair| pair[0].date == pair[1].date) {
            return Err(MonitorError::invalid(format!(
                "cash settlement for {} listed twice",
                pair[0].date
            )));
        }
        Ok(Self { days })
    }

    pub fn days(&self) -> &[CashSettlementDay] {
        &self.days
    }

    pub fn latest(&self) -> Option<&CashSettlementDay> {
        self.days.first()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Change of each day over the day before it, newest first.
    ///
    /// The oldest day only serves as a base, so N days yield N-1 rows.
    /// `fx_rate` is INR per USD.
    pub fn changes(&self, fx_rate: Decimal) -> Vec<SettlementChange> {
        self.days
            .windows(2)
            .map(|pair| {
                let (day, previous) = (&pair[0], &pair[1]);
                let usd_change = compute_spread(day.price, previous.price);
                let percent_change = usd_change
                    .delta
                    .checked_div(previous.price)
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));

                SettlementChange {
                    date: day.date,
                    price: day.price,
                    usd_change,
                    percent_change,
                    inr_change_per_kg: usd_per_mt_to_inr_per_kg(usd_change.delta, fx_rate),
                    trend: Trend::from_change(usd_change.delta),
                }
            })
            .collect()
    }
}
