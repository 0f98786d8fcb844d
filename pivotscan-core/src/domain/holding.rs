//! Holding — the cost basis handed to the exit rule engine.

use serde::{Deserialize, Serialize};

/// An open position as the exit engine sees it: what was paid and how much
/// of it was risked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub entry_price: f64,
    /// Initial stop distance below entry as a fraction (e.g. 0.07).
    pub initial_stop_pct: f64,
}

impl Holding {
    pub fn new(entry_price: f64, initial_stop_pct: f64) -> Self {
        assert!(entry_price > 0.0, "entry_price must be positive");
        assert!(
            initial_stop_pct > 0.0 && initial_stop_pct < 1.0,
            "initial_stop_pct must be in (0, 1)"
        );
        Self {
            entry_price,
            initial_stop_pct,
        }
    }

    /// Dollar risk taken at entry (1R).
    pub fn initial_risk(&self) -> f64 {
        self.entry_price * self.initial_stop_pct
    }

    /// The hard stop level: entry minus the initial risk.
    pub fn hard_stop(&self) -> f64 {
        self.entry_price * (1.0 - self.initial_stop_pct)
    }

    /// Current profit expressed in R-multiples.
    pub fn r_multiple(&self, close: f64) -> f64 {
        (close - self.entry_price) / self.initial_risk()
    }
}
