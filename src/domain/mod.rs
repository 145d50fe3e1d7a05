//! Domain layer containing the pricing core and market data model
//!
//! Quote value objects, the spread and landed-price calculators, supplier
//! benchmarking, and the snapshot aggregator that assembles the view model
//! presentation renders.

/// Supplier price benchmarking
pub mod benchmark;
/// Raw market-data feed shapes
pub mod feed;
/// Landed-price calculators and their input forms
pub mod landed_price;
/// Shared holder of the latest market view
pub mod market_board;
/// Quote value objects
pub mod quotes;
/// Cash settlement history
pub mod settlement;
/// Snapshot aggregation into the view model
pub mod snapshot;
/// Spread, curve structure and arbitrage calculations
pub mod spread;
/// Core types and primitives
pub mod types;

pub use feed::*;
pub use quotes::*;
pub use types::*;

pub use benchmark::{benchmark_suppliers, SupplierBenchmark};
pub use landed_price::{
    lme_import_landed_price, mcx_landed_price, LmeImportForm, McxCalculatorForm, McxPriceMode,
};
pub use market_board::{BoardState, MarketBoard};
pub use settlement::{CashSettlementHistory, SettlementChange};
pub use snapshot::{MarketView, QuoteGroup, SnapshotAggregator};
pub use spread::{
    compute_arbitrage_magnitude, compute_spread, curve_structure, ladder_spreads,
    round_for_display, CurveStructure, SpreadRecord, SpreadResult,
};
