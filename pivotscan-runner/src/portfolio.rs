//! Portfolio configuration — held positions for the health check.
//!
//! TOML keyed by ticker:
//!
//! ```toml
//! [holdings."4939.TW"]
//! cost = 51.2
//! stop_loss_pct = 0.07
//! ```

use pivotscan_core::domain::Holding;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

fn default_stop_loss_pct() -> f64 {
    0.07
}

/// One held position as configured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldingEntry {
    /// Average cost per share.
    pub cost: f64,
    /// Initial stop distance as a fraction. Defaults to 7%.
    #[serde(default = "default_stop_loss_pct")]
    pub stop_loss_pct: f64,
}

/// The configured portfolio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(default)]
    pub holdings: BTreeMap<String, HoldingEntry>,
}

impl Portfolio {
    /// Load a portfolio from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read portfolio file: {e}"))?;
        Self::from_toml(&content)
    }

    /// Parse a portfolio from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        let portfolio: Portfolio =
            toml::from_str(content).map_err(|e| format!("parse portfolio TOML: {e}"))?;
        for (ticker, entry) in &portfolio.holdings {
            if entry.cost <= 0.0 {
                return Err(format!("holding {ticker}: cost must be positive"));
            }
            if entry.stop_loss_pct <= 0.0 || entry.stop_loss_pct >= 1.0 {
                return Err(format!("holding {ticker}: stop_loss_pct must be in (0, 1)"));
            }
        }
        Ok(portfolio)
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    /// The core-engine view of one entry.
    pub fn holding_for(&self, ticker: &str) -> Option<Holding> {
        self.holdings
            .get(ticker)
            .map(|e| Holding::new(e.cost, e.stop_loss_pct))
    }
}
