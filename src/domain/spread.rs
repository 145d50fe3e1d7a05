use crate::domain::{quotes::*, types::*};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a forward curve between two contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveStructure {
    /// Later contract priced at or above the earlier one
    Contango,
    /// Earlier contract priced above the later one
    Backwardation,
}

impl CurveStructure {
    /// Classifies a later-minus-earlier delta. A zero delta is contango.
    pub fn from_delta(delta: Decimal) -> Self {
        if delta >= Decimal::ZERO {
            CurveStructure::Contango
        } else {
            CurveStructure::Backwardation
        }
    }
}

impl fmt::Display for CurveStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveStructure::Contango => write!(f, "Contango"),
            CurveStructure::Backwardation => write!(f, "Backwardation"),
        }
    }
}

/// Spread between two adjacent contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadResult {
    /// `current - previous`, unrounded
    pub delta: Decimal,
    /// True when `delta >= 0`
    pub is_contango: bool,
}

impl SpreadResult {
    /// Curve structure implied by the spread
    pub fn structure(&self) -> CurveStructure {
        if self.is_contango {
            CurveStructure::Contango
        } else {
            CurveStructure::Backwardation
        }
    }
}

/// Computes the spread of `current` over `previous`.
///
/// Any two prices are accepted as long as their difference fits in a
/// `Decimal` (magnitude below about 7.9e28); beyond that the subtraction
/// panics. Exchange prices sit far inside that range.
pub fn compute_spread(current: Decimal, previous: Decimal) -> SpreadResult {
    let delta = current - previous;
    SpreadResult {
        delta,
        is_contango: CurveStructure::from_delta(delta) == CurveStructure::Contango,
    }
}

/// Spread of one ladder contract over the contract before it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadRecord {
    /// Ladder index of the later contract (always > 0)
    pub index: usize,
    /// Label of the later contract
    pub label: String,
    /// Spread of the later contract over the earlier one
    pub spread: SpreadResult,
}

impl SpreadRecord {
    /// Delta rounded to 2 dp, prefixed with `+` when strictly positive
    pub fn display_delta(&self) -> String {
        let rounded = round_for_display(self.spread.delta);
        if self.spread.delta.is_zero() {
            "0.00".to_string()
        } else if self.spread.delta > Decimal::ZERO {
            format!("+{:.2}", rounded)
        } else {
            format!("{:.2}", rounded)
        }
    }
}

/// Spreads between each pair of adjacent contracts.
///
/// A ladder of N contracts yields N-1 records in maturity order.
pub fn ladder_spreads(ladder: &FuturesLadder) -> Vec<SpreadRecord> {
    ladder
        .quotes()
        .windows(2)
        .enumerate()
        .map(|(i, pair)| SpreadRecord {
            index: i + 1,
            label: pair[1].label.clone(),
            spread: compute_spread(pair[1].price, pair[0].price),
        })
        .collect()
}

/// Structure of the whole curve, back contract against front contract.
///
/// `None` for a single-contract ladder.
pub fn curve_structure(ladder: &FuturesLadder) -> Option<CurveStructure> {
    if ladder.contract_count() < 2 {
        return None;
    }
    Some(CurveStructure::from_delta(
        ladder.back().price - ladder.front().price,
    ))
}

/// Signed gap between a domestic INR/kg price and a USD/MT price.
///
/// `market_b` is converted to INR/kg with `fx_rate` (INR per USD) and
/// [`KG_PER_METRIC_TON`]. Positive means the domestic market trades above
/// import parity.
pub fn compute_arbitrage_magnitude(
    market_a: Decimal,
    market_b: Decimal,
    fx_rate: Decimal,
) -> Decimal {
    market_a - usd_per_mt_to_inr_per_kg(market_b, fx_rate)
}

/// Converts a USD/MT price to INR/kg
pub fn usd_per_mt_to_inr_per_kg(usd_per_mt: Decimal, fx_rate: Decimal) -> Decimal {
    usd_per_mt * fx_rate / KG_PER_METRIC_TON
}

/// Rounds a currency amount to 2 dp for display, midpoint away from zero
pub fn round_for_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn ladder(exchange: Exchange, prices: &[Decimal]) -> FuturesLadder {
        let ts = chrono::Utc.with_ymd_and_hms(2026, 1, 30, 14, 40, 0).unwrap();
        let quotes = prices
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Quote::new(
                    format!("C{}", i + 1),
                    *p,
                    exchange.quote_currency(),
                    ts,
                    dec!(0.1),
                )
            })
            .collect();
        FuturesLadder::new(exchange, quotes).unwrap()
    }

    #[test]
    fn test_spread_delta_and_sign() {
        let spread = compute_spread(dec!(216.10), dec!(214.45));
        assert_eq!(spread.delta, dec!(1.65));
        assert!(spread.is_contango);

        let spread = compute_spread(dec!(214.45), dec!(216.10));
        assert_eq!(spread.delta, dec!(-1.65));
        assert!(!spread.is_contango);
        assert_eq!(spread.structure(), CurveStructure::Backwardation);
    }

    #[test]
    fn test_spread_at_range_edges() {
        let top = compute_spread(Decimal::MAX, Decimal::ZERO);
        assert_eq!(top.delta, Decimal::MAX);
        assert!(top.is_contango);

        let bottom = compute_spread(Decimal::ZERO, Decimal::MAX);
        assert_eq!(bottom.delta, Decimal::MIN);
        assert!(!bottom.is_contango);

        let flat = compute_spread(Decimal::MAX, Decimal::MAX);
        assert!(flat.delta.is_zero());
    }

    #[test]
    fn test_zero_spread_is_contango() {
        let spread = compute_spread(dec!(3257.66), dec!(3257.66));
        assert_eq!(spread.delta, Decimal::ZERO);
        assert!(spread.is_contango);
        // Zero change is neutral for trends, contango for spreads
        assert_eq!(Trend::from_change(spread.delta), Trend::Neutral);
    }

    #[test]
    fn test_ladder_spreads_tagged_with_later_index() {
        let ladder = ladder(Exchange::Mcx, &[dec!(214.45), dec!(216.10), dec!(217.55)]);
        let spreads = ladder_spreads(&ladder);

        assert_eq!(spreads.len(), 2);
        assert_eq!(spreads[0].index, 1);
        assert_eq!(spreads[0].label, "C2");
        assert_eq!(spreads[0].spread.delta, dec!(1.65));
        assert_eq!(spreads[1].index, 2);
        assert_eq!(spreads[1].spread.delta, dec!(1.45));
    }

    #[test]
    fn test_single_contract_ladder_has_no_spreads() {
        let ladder = ladder(Exchange::Lme, &[dec!(3257.66)]);
        assert!(ladder_spreads(&ladder).is_empty());
        assert_eq!(curve_structure(&ladder), None);
    }

    #[test]
    fn test_curve_structure() {
        let rising = ladder(Exchange::Shfe, &[dec!(18425), dec!(18550), dec!(18610)]);
        assert_eq!(curve_structure(&rising), Some(CurveStructure::Contango));

        let falling = ladder(Exchange::Shfe, &[dec!(18610), dec!(18550)]);
        assert_eq!(curve_structure(&falling), Some(CurveStructure::Backwardation));
    }

    #[test]
    fn test_display_delta() {
        let ladder = ladder(
            Exchange::Mcx,
            &[dec!(214.45), dec!(216.10), dec!(215.70), dec!(215.70)],
        );
        let shown: Vec<String> = ladder_spreads(&ladder)
            .iter()
            .map(SpreadRecord::display_delta)
            .collect();
        assert_eq!(shown, vec!["+1.65", "-0.40", "0.00"]);
    }

    #[test]
    fn test_arbitrage_magnitude() {
        // 3000 USD/MT at 80 INR/USD = 240 INR/kg
        assert_eq!(
            compute_arbitrage_magnitude(dec!(250), dec!(3000), dec!(80)),
            dec!(10)
        );
        assert_eq!(
            compute_arbitrage_magnitude(dec!(214.45), dec!(3000), dec!(80)),
            dec!(-25.55)
        );
    }

    #[test]
    fn test_round_for_display() {
        assert_eq!(round_for_display(dec!(291.211023082)), dec!(291.21));
        assert_eq!(round_for_display(dec!(0.125)), dec!(0.13));
        assert_eq!(round_for_display(dec!(-0.125)), dec!(-0.13));
    }
}
