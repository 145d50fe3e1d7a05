//! Runtime configuration read from environment variables

use crate::domain::landed_price::{
    DEFAULT_IMPORT_DUTY_PERCENT, DEFAULT_MCX_DELIVERY, DEFAULT_MCX_PREMIUM,
};
use crate::domain::types::*;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default snapshot file, relative to the working directory
pub const DEFAULT_SNAPSHOT_PATH: &str = "data/market_snapshot.json";
/// Default polling interval
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 5_000;
/// Default number of refreshes the binary runs before reporting
pub const DEFAULT_REFRESH_CYCLES: u64 = 3;
/// FX rate the import calculator is prefilled from
pub const DEFAULT_FX_PAIR: &str = "USD/INR Live";

/// Monitor settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Snapshot JSON file polled by the refresh pipeline
    pub snapshot_path: PathBuf,
    /// Time between refreshes
    pub refresh_interval: Duration,
    /// Refreshes to run; zero polls until interrupted
    pub refresh_cycles: u64,
    /// MCX physical premium, INR/kg
    pub mcx_premium: Decimal,
    /// MCX delivery charge, INR/kg
    pub mcx_delivery: Decimal,
    /// Import duty percentage
    pub import_duty_percent: Decimal,
    /// Name of the FX rate used for LME conversions
    pub fx_pair: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            refresh_interval: Duration::from_millis(DEFAULT_REFRESH_INTERVAL_MS),
            refresh_cycles: DEFAULT_REFRESH_CYCLES,
            mcx_premium: DEFAULT_MCX_PREMIUM,
            mcx_delivery: DEFAULT_MCX_DELIVERY,
            import_duty_percent: DEFAULT_IMPORT_DUTY_PERCENT,
            fx_pair: DEFAULT_FX_PAIR.to_string(),
        }
    }
}

impl MonitorConfig {
    /// Reads the configuration from the process environment
    ///
    /// Environment variables:
    /// - SNAPSHOT_PATH
    /// - REFRESH_INTERVAL_MS
    /// - REFRESH_CYCLES
    /// - MCX_PREMIUM
    /// - MCX_DELIVERY
    /// - IMPORT_DUTY_PERCENT
    /// - FX_PAIR
    pub fn from_env() -> MonitorResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Unset keys take their defaults; set but unparseable values are
    /// `InvalidInput`.
    pub fn from_lookup<F>(lookup: F) -> MonitorResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let interval_ms = match get("REFRESH_INTERVAL_MS") {
            Some(v) => parse_number::<u64>("REFRESH_INTERVAL_MS", &v)?,
            None => DEFAULT_REFRESH_INTERVAL_MS,
        };
        if interval_ms == 0 {
            return Err(MonitorError::invalid("REFRESH_INTERVAL_MS must be positive"));
        }

        Ok(Self {
            snapshot_path: get("SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),
            refresh_interval: Duration::from_millis(interval_ms),
            refresh_cycles: match get("REFRESH_CYCLES") {
                Some(v) => parse_number("REFRESH_CYCLES", &v)?,
                None => defaults.refresh_cycles,
            },
            mcx_premium: decimal_or("MCX_PREMIUM", get("MCX_PREMIUM"), defaults.mcx_premium)?,
            mcx_delivery: decimal_or("MCX_DELIVERY", get("MCX_DELIVERY"), defaults.mcx_delivery)?,
            import_duty_percent: decimal_or(
                "IMPORT_DUTY_PERCENT",
                get("IMPORT_DUTY_PERCENT"),
                defaults.import_duty_percent,
            )?,
            fx_pair: get("FX_PAIR").unwrap_or(defaults.fx_pair),
        })
    }

    /// Refresh cycle limit for the poller; `None` when unbounded
    pub fn cycle_limit(&self) -> Option<u64> {
        (self.refresh_cycles > 0).then_some(self.refresh_cycles)
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> MonitorResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| MonitorError::invalid(format!("{} is not a whole number: {:?}", key, value)))
}

fn decimal_or(key: &str, value: Option<String>, default: Decimal) -> MonitorResult<Decimal> {
    value.map_or(Ok(default), |v| parse_decimal(key, &v))
}
