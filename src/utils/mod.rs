//! Process-level utilities

/// Tracing subscriber setup
pub mod logger;

pub use logger::setup_logger;
