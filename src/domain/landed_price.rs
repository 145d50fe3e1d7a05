use crate::domain::{spread::usd_per_mt_to_inr_per_kg, types::*};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Default MCX premium, INR/kg
pub const DEFAULT_MCX_PREMIUM: Decimal = dec!(2.50);
/// Default delivery charge, INR/kg
pub const DEFAULT_MCX_DELIVERY: Decimal = dec!(1.20);
/// Default basic customs duty on primary aluminium, percent
pub const DEFAULT_IMPORT_DUTY_PERCENT: Decimal = dec!(7.5);

/// Landed price of MCX-sourced metal, per kg.
///
/// All three inputs are per-kg amounts in the same currency. The result is
/// not rounded.
pub fn mcx_landed_price(futures_price: Decimal, premium: Decimal, delivery: Decimal) -> Decimal {
    futures_price + premium + delivery
}

/// Landed price of LME-priced imports in INR/kg, duty included.
///
/// `(usd_per_mt * fx / 1000) * (1 + duty / 100)`, not rounded.
pub fn lme_import_landed_price(
    usd_per_mt: Decimal,
    fx_rate_inr_per_usd: Decimal,
    duty_percent: Decimal,
) -> Decimal {
    usd_per_mt_to_inr_per_kg(usd_per_mt, fx_rate_inr_per_usd)
        * (Decimal::ONE + duty_percent / Decimal::ONE_HUNDRED)
}

/// Where the MCX calculator takes its futures price from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum McxPriceMode {
    /// Front-month MCX quote from the current market view
    #[default]
    Live,
    /// Price typed into the form
    Manual,
}

/// Text inputs of the MCX landed-price calculator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McxCalculatorForm {
    /// Price source toggle
    pub mode: McxPriceMode,
    /// Futures price used in manual mode
    pub manual_price: String,
    /// Premium per kg
    pub premium: String,
    /// Delivery charge per kg
    pub delivery: String,
}

impl Default for McxCalculatorForm {
    fn default() -> Self {
        Self {
            mode: McxPriceMode::Live,
            manual_price: String::new(),
            premium: DEFAULT_MCX_PREMIUM.to_string(),
            delivery: DEFAULT_MCX_DELIVERY.to_string(),
        }
    }
}

impl McxCalculatorForm {
    /// Resolves the futures price for the current mode
    pub fn futures_price(&self, live_front_month: Option<Decimal>) -> MonitorResult<Decimal> {
        match self.mode {
            McxPriceMode::Live => live_front_month
                .ok_or_else(|| MonitorError::invalid("no live MCX front-month price available")),
            McxPriceMode::Manual => parse_decimal("MCX price", &self.manual_price),
        }
    }

    /// Evaluates the landed price per kg.
    ///
    /// `live_front_month` is only consulted in [`McxPriceMode::Live`].
    pub fn evaluate(&self, live_front_month: Option<Decimal>) -> MonitorResult<Decimal> {
        let futures_price = self.futures_price(live_front_month)?;
        let premium = parse_decimal("premium", &self.premium)?;
        let delivery = parse_decimal("delivery", &self.delivery)?;
        futures_price
            .checked_add(premium)
            .and_then(|sum| sum.checked_add(delivery))
            .ok_or_else(|| out_of_range("MCX landed price"))
    }
}

/// Text inputs of the LME import calculator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LmeImportForm {
    /// LME price, USD/MT
    pub usd_per_mt: String,
    /// INR per USD
    pub fx_rate: String,
    /// Import duty, percent
    pub duty_percent: String,
}

impl LmeImportForm {
    /// Creates a form pre-filled from live prices and the default duty
    pub fn prefilled(usd_per_mt: Decimal, fx_rate: Decimal) -> Self {
        Self {
            usd_per_mt: usd_per_mt.to_string(),
            fx_rate: fx_rate.to_string(),
            duty_percent: DEFAULT_IMPORT_DUTY_PERCENT.to_string(),
        }
    }

    /// Evaluates the landed price in INR/kg
    pub fn evaluate(&self) -> MonitorResult<Decimal> {
        let usd_per_mt = parse_decimal("LME USD/MT", &self.usd_per_mt)?;
        let fx_rate = parse_decimal("FX rate", &self.fx_rate)?;
        let duty_percent = parse_decimal("import duty", &self.duty_percent)?;

        // Same operation order as lme_import_landed_price
        let per_kg = usd_per_mt
            .checked_mul(fx_rate)
            .and_then(|inr_per_mt| inr_per_mt.checked_div(KG_PER_METRIC_TON));
        let duty_factor = duty_percent
            .checked_div(Decimal::ONE_HUNDRED)
            .and_then(|duty| Decimal::ONE.checked_add(duty));

        per_kg
            .zip(duty_factor)
            .and_then(|(per_kg, factor)| per_kg.checked_mul(factor))
            .ok_or_else(|| out_of_range("LME import landed price"))
    }
}

fn out_of_range(what: &str) -> MonitorError {
    MonitorError::invalid(format!("{} is out of range", what))
}
