//! # Aluminium Market Monitor
//!
//! Pricing and spread core for an aluminium market dashboard:
//! - Calendar spreads and contango/backwardation across futures ladders
//! - MCX and LME-import landed prices per kg, with their calculator forms
//! - Cross-market arbitrage magnitude normalized to INR/kg
//! - Supplier price benchmarking against a landed reference
//! - Snapshot aggregation into a display-ready market view
//! - A polling refresh pipeline publishing to a shared market board
//!
//! ## Architecture
//!
//! - **Domain**: Pure calculators, quote value objects, the aggregator and
//!   the market board
//! - **Infrastructure**: JSON snapshot parsing and the tokio refresh pipeline
//! - **Config / utils**: environment configuration and tracing setup
//!
//! ## Numerics
//!
//! Every price is a `rust_decimal::Decimal`. Calculators never round;
//! [`round_for_display`] applies two-decimal, half-away-from-zero rounding
//! at the presentation edge.

pub mod config;
pub mod domain;
pub mod infrastructure;

/// Utilities for logging
pub mod utils;

// Re-export commonly used types for convenience
pub use config::MonitorConfig;
pub use domain::{
    benchmark::{benchmark_suppliers, SupplierBenchmark},
    feed::*,
    landed_price::{
        lme_import_landed_price, mcx_landed_price, LmeImportForm, McxCalculatorForm, McxPriceMode,
    },
    market_board::{BoardState, MarketBoard},
    quotes::*,
    settlement::{CashSettlementHistory, SettlementChange},
    snapshot::{MarketView, QuoteGroup, SnapshotAggregator},
    spread::{
        compute_arbitrage_magnitude, compute_spread, curve_structure, ladder_spreads,
        round_for_display, usd_per_mt_to_inr_per_kg, CurveStructure, SpreadRecord, SpreadResult,
    },
    types::*,
};

pub use infrastructure::{
    ingestion::{
        poll_source, JsonFileSource, MultiFeedIngester, RefreshResult, RefreshStats,
        SnapshotIngester, SnapshotSource,
    },
    parsers::{load_market_snapshot, parse_amount, parse_market_snapshot, parse_percent},
};

/// Main result type for the monitor
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_full_refresh_integration() {
        let _ = tracing_subscriber::fmt::try_init();

        let board = MarketBoard::new();
        let (tx, rx) = mpsc::channel(4);
        let mut ingester = SnapshotIngester::new(rx, board.clone());

        let source = JsonFileSource::new(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/data/market_snapshot.json"
        ));
        let delivered =
            poll_source(&source, tx, std::time::Duration::from_millis(1), Some(1)).await;
        assert_eq!(delivered, 1);

        ingester.run().await;

        let view = board.current().unwrap().expect("snapshot should publish");
        let mcx = view.group(Exchange::Mcx).unwrap();
        let deltas: Vec<String> = mcx.spreads.iter().map(|s| s.display_delta()).collect();
        assert_eq!(deltas, vec!["+1.65", "+1.45"]);

        let landed = McxCalculatorForm::default()
            .evaluate(view.front_month(Exchange::Mcx))
            .unwrap();
        assert_eq!(landed, dec!(218.15));
    }

    #[test]
    fn test_calculators_share_unit_conversion() {
        let per_kg = usd_per_mt_to_inr_per_kg(dec!(3000), dec!(80));
        assert_eq!(per_kg, dec!(240));
        assert_eq!(lme_import_landed_price(dec!(3000), dec!(80), dec!(0)), per_kg);
        assert_eq!(
            compute_arbitrage_magnitude(dec!(250), dec!(3000), dec!(80)),
            dec!(250) - per_kg
        );
    }
}
