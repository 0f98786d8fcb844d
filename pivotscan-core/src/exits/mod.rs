//! Exit rule ladder — the mechanical sell rules for an open position.
//!
//! Rules run in a fixed order; later rules may override the action set by an
//! earlier one, except the hard stop, which is terminal:
//!
//! 1. Hard stop — close below entry minus the initial risk.
//! 2. Breakeven lock — at 2R the stop moves to the cost basis.
//! 3. Scale-out flag — at 3R, advise taking partial profit. Advisory only;
//!    position size is never mutated.
//! 4. MA trailing stop — a close below the 10-bar average (super-strong
//!    names) or the 20-bar average (everything else) is a sell.
//!
//! The suggested defense price is the maximum of all active floors — it only
//! ever tightens.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Holding};
use crate::indicators::snapshot::{SMA_10, SMA_20};
use crate::indicators::IndicatorValues;

/// How many trailing bars must hold above the 10-bar average for the
/// "super-strong" classification.
pub const STRENGTH_WINDOW: usize = 35;

/// R-multiple at which the stop moves to breakeven.
pub const BREAKEVEN_R: f64 = 2.0;

/// R-multiple at which partial profit-taking is advised.
pub const SCALE_OUT_R: f64 = 3.0;

/// Why a position should be closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    HardStop,
    Breakeven,
    MaBreak,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::HardStop => "hard-stop",
            ExitReason::Breakeven => "breakeven",
            ExitReason::MaBreak => "ma-break",
        }
    }
}

/// The recommended action for an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitAction {
    Hold,
    PartialProfit,
    Exit(ExitReason),
}

impl ExitAction {
    pub fn is_exit(&self) -> bool {
        matches!(self, ExitAction::Exit(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExitAction::Hold => "hold",
            ExitAction::PartialProfit => "partial-profit",
            ExitAction::Exit(reason) => reason.as_str(),
        }
    }
}

/// One evaluation of the rule ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitDecision {
    pub action: ExitAction,
    /// Highest active defensive level; a close below it tomorrow is a sell.
    pub defense_price: f64,
    /// Current profit in R-multiples.
    pub r_multiple: f64,
    pub rationale: Vec<String>,
}

/// The rule ladder itself. Stateless — every evaluation derives everything
/// from the holding and the series.
#[derive(Debug, Clone)]
pub struct ExitEngine {
    strength_window: usize,
}

impl ExitEngine {
    pub fn new() -> Self {
        Self {
            strength_window: STRENGTH_WINDOW,
        }
    }

    /// Run the ladder for `holding` at bar `i`.
    pub fn evaluate(
        &self,
        holding: &Holding,
        bars: &[Bar],
        i: usize,
        indicators: &IndicatorValues,
    ) -> ExitDecision {
        let close = bars[i].close;
        let entry = holding.entry_price;
        let hard_stop = holding.hard_stop();
        let r_multiple = holding.r_multiple(close);

        let mut action = ExitAction::Hold;
        let mut rationale = Vec::new();
        let mut defense_price = hard_stop;

        // Rule 1: hard stop — terminal.
        let stopped_out = close < hard_stop;
        if stopped_out {
            action = ExitAction::Exit(ExitReason::HardStop);
            rationale.push(format!("closed below the initial stop {hard_stop:.2}"));
        }

        // Rule 2: breakeven lock at 2R.
        if !stopped_out && r_multiple >= BREAKEVEN_R {
            if close < entry {
                action = ExitAction::Exit(ExitReason::Breakeven);
                rationale.push(format!("profit given back to the cost basis {entry:.2}"));
            } else {
                rationale.push(format!(
                    "up {r_multiple:.1}R, stop moved to breakeven {entry:.2}"
                ));
            }
        }
        if r_multiple >= BREAKEVEN_R {
            defense_price = defense_price.max(entry);
        }

        // Rule 3: scale-out flag at 3R. Advisory — never closes the position.
        if r_multiple >= SCALE_OUT_R {
            rationale.push(format!("up {r_multiple:.1}R, take partial profit"));
            if action == ExitAction::Hold {
                action = ExitAction::PartialProfit;
            }
        }

        // Rule 4: MA trailing stop. Super-strong names defend the 10-bar
        // average, everything else the 20-bar. Overrides all but the hard stop.
        let super_strong = self.is_super_strong(bars, i, indicators);
        let ma_key = if super_strong { SMA_10 } else { SMA_20 };
        if let Some(check_ma) = indicators.get_valid(ma_key, i) {
            let ma_name = if super_strong { "10-bar MA" } else { "20-bar MA" };
            if close < check_ma {
                if !stopped_out {
                    action = ExitAction::Exit(ExitReason::MaBreak);
                }
                rationale.push(format!("closed below the {ma_name} {check_ma:.2}"));
            } else {
                rationale.push(format!("holding above the {ma_name} {check_ma:.2}"));
            }
            defense_price = defense_price.max(check_ma);
        }

        ExitDecision {
            action,
            defense_price,
            r_multiple,
            rationale,
        }
    }

    /// True when every close in the trailing window held above the 10-bar
    /// average. An unseeded window never qualifies.
    fn is_super_strong(&self, bars: &[Bar], i: usize, indicators: &IndicatorValues) -> bool {
        if i + 1 < self.strength_window {
            return false;
        }
        (i + 1 - self.strength_window..=i).all(|j| {
            indicators
                .get_valid(SMA_10, j)
                .is_some_and(|ma| bars[j].close > ma)
        })
    }
}

impl Default for ExitEngine {
    fn default() -> Self {
        Self::new()
    }
}
