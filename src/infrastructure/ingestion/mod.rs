//! Refresh pipeline for market snapshots
//!
//! Sources are polled on an interval, results travel over a tokio channel,
//! and ingesters aggregate each snapshot onto a shared market board.

/// Snapshot sources, polling and board ingestion
pub mod snapshot_ingester;

pub use snapshot_ingester::*;
