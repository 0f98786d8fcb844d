//! Scan profiles — the tunable filter parameters for one screening pass.

use serde::{Deserialize, Serialize};

/// Filter parameters for one screening pass.
///
/// Two named profiles ship with the system: `chose` (the pattern scan) and
/// `drive` (the momentum/accumulation scan). Both share the same classifier;
/// they differ only in these thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanProfile {
    pub name: String,
    /// Minimum close price — screens out penny stocks.
    pub min_price: f64,
    /// Minimum 20-bar average volume in shares — liquidity floor.
    pub min_volume: f64,
    /// Lookback period for the rate-of-change used in the RS comparison.
    pub rs_period: usize,
    /// Required RS spread over the benchmark, in percentage points.
    pub rs_threshold_pct: f64,
    /// Initial stop distance below entry, as a fraction.
    pub initial_stop_pct: f64,
}

impl ScanProfile {
    /// The pattern scan: one-month RS, any edge over the benchmark qualifies.
    pub fn chose() -> Self {
        Self {
            name: "chose".into(),
            min_price: 20.0,
            min_volume: 800_000.0,
            rs_period: 20,
            rs_threshold_pct: 0.0,
            initial_stop_pct: 0.07,
        }
    }

    /// The momentum scan: quarterly RS, must beat the benchmark by 5 points,
    /// tighter liquidity floor.
    pub fn drive() -> Self {
        Self {
            name: "drive".into(),
            min_price: 20.0,
            min_volume: 1_000_000.0,
            rs_period: 60,
            rs_threshold_pct: 5.0,
            initial_stop_pct: 0.07,
        }
    }
}
