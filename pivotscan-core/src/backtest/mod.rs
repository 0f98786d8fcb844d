//! Backtest runner — replays the classifier and exit ladder bar-by-bar.
//!
//! A two-state machine per instrument: Flat → Long on a firing setup,
//! Long → Flat on an exit. Entries and exits both fill at the close of the
//! signal bar. Partial-profit flags keep the state unchanged (position size
//! is never mutated). A position still open at the end of the window is left
//! unresolved and contributes no trade.

pub mod stats;

pub use stats::BacktestSummary;

use serde::{Deserialize, Serialize};

use crate::domain::{BarSeries, Holding, ScanProfile, TradeRecord};
use crate::exits::{ExitAction, ExitEngine};
use crate::indicators::SnapshotSet;
use crate::setups::{SetupClassifier, SetupKind};

/// Bars consumed before the first evaluation: enough to seed the 250-bar
/// rolling high, the 200-bar average, and every shorter sub-window.
pub const WARMUP_BARS: usize = 250;

/// The single open position carried through a run.
#[derive(Debug, Clone, Copy)]
struct Position {
    entry_price: f64,
    entry_bar: usize,
    setup: SetupKind,
}

/// Everything a backtest run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub symbol: String,
    pub profile: String,
    pub trades: Vec<TradeRecord>,
    pub summary: BacktestSummary,
}

/// Drives one instrument through the full history.
pub struct BacktestRunner {
    profile: ScanProfile,
    classifier: SetupClassifier,
    exits: ExitEngine,
}

impl BacktestRunner {
    pub fn new(profile: ScanProfile) -> Self {
        let classifier = SetupClassifier::new(profile.clone());
        Self {
            profile,
            classifier,
            exits: ExitEngine::new(),
        }
    }

    /// Replay the series.
    ///
    /// `bench_roc` is a benchmark rate-of-change series aligned to the same
    /// bar indices (NaN or missing entries evaluate as a neutral 0.0). Pass
    /// None to screen against a flat benchmark.
    pub fn run(&self, series: &BarSeries, bench_roc: Option<&[f64]>) -> BacktestReport {
        let snapshots = SnapshotSet::build(series, self.profile.rs_period);
        let indicators = snapshots.values();
        let bars = series.bars();

        let mut position: Option<Position> = None;
        let mut trades = Vec::new();

        for i in WARMUP_BARS..bars.len() {
            match position {
                None => {
                    let bench = bench_roc
                        .and_then(|s| s.get(i).copied())
                        .filter(|v| !v.is_nan())
                        .unwrap_or(0.0);
                    if let Some(setup) = self.classifier.classify(bars, i, indicators, bench) {
                        position = Some(Position {
                            entry_price: bars[i].close,
                            entry_bar: i,
                            setup: setup.kind,
                        });
                    }
                }
                Some(pos) => {
                    let holding = Holding::new(pos.entry_price, self.profile.initial_stop_pct);
                    let decision = self.exits.evaluate(&holding, bars, i, indicators);
                    if let ExitAction::Exit(reason) = decision.action {
                        let exit_price = bars[i].close;
                        trades.push(TradeRecord {
                            entry_bar: pos.entry_bar,
                            entry_date: bars[pos.entry_bar].date,
                            entry_price: pos.entry_price,
                            exit_bar: i,
                            exit_date: bars[i].date,
                            exit_price,
                            return_pct: (exit_price - pos.entry_price) / pos.entry_price,
                            setup: pos.setup,
                            exit_reason: reason,
                        });
                        position = None;
                    }
                }
            }
        }

        let summary = BacktestSummary::from_trades(&trades);
        BacktestReport {
            symbol: series.symbol().to_string(),
            profile: self.profile.name.clone(),
            trades,
            summary,
        }
    }
}
