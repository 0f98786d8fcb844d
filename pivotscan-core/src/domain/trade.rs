//! TradeRecord — a completed round-trip trade from the backtest.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::exits::ExitReason;
use crate::setups::SetupKind;

/// A complete entry → exit round trip.
///
/// Carries which setup opened the trade and which exit rule closed it, so a
/// report can break results down by pattern and by rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub entry_bar: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,

    pub exit_bar: usize,
    pub exit_date: NaiveDate,
    pub exit_price: f64,

    /// Realized return as a fraction: (exit - entry) / entry.
    pub return_pct: f64,

    pub setup: SetupKind,
    pub exit_reason: ExitReason,
}

impl TradeRecord {
    pub fn is_winner(&self) -> bool {
        self.return_pct > 0.0
    }

    pub fn bars_held(&self) -> usize {
        self.exit_bar - self.entry_bar
    }
}
