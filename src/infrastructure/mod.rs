//! Infrastructure layer providing snapshot parsing and refresh ingestion
//!
//! This module contains the components that feed the domain layer: the JSON
//! snapshot parser and the polling pipeline that keeps the market board fresh.

/// Refresh pipeline for market snapshots
pub mod ingestion;
/// Data parsing utilities for the market snapshot feed
pub mod parsers;

pub use ingestion::*;
pub use parsers::*;
