//! JSON parsing utilities for market snapshots
//!
//! Converts the display-string JSON feed into domain types.

/// JSON parser for the market snapshot feed
pub mod json_parser;

pub use json_parser::*;
