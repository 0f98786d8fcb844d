//! Setup classification — hard filters plus an ordered pattern chain.
//!
//! A stock must clear every hard filter (price floor, liquidity floor,
//! Stage-2 trend structure, relative strength vs the benchmark) before any
//! pattern is considered. Patterns are then evaluated in a fixed priority
//! order and the first match wins:
//!
//! 1. [`HighTightFlag`] — steep rally, shallow pullback, first-day breakout
//! 2. [`GapUp`] — large opening gap on heavy volume
//! 3. [`VcpBreakout`] — first-day breakout near the yearly high on volume
//!
//! The order encodes the doctrine's conviction ranking (flag > gap >
//! breakout). It is the tie-break policy; do not reorder.

pub mod accumulation;
pub mod gap_up;
pub mod high_tight_flag;
pub mod vcp_breakout;

pub use accumulation::{AccumulationDetector, MvpSignal};
pub use gap_up::GapUp;
pub use high_tight_flag::HighTightFlag;
pub use vcp_breakout::VcpBreakout;

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, ScanProfile};
use crate::indicators::snapshot::{roc_key, AVG_VOLUME_20, MAX_HIGH_20, SMA_200, SMA_50};
use crate::indicators::IndicatorValues;

/// Stop suggestion sits a fixed 7% below the pivot.
pub const PIVOT_STOP_RATIO: f64 = 0.93;

/// Which entry pattern fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupKind {
    HighTightFlag,
    GapUp,
    VcpBreakout,
}

impl SetupKind {
    pub fn label(&self) -> &'static str {
        match self {
            SetupKind::HighTightFlag => "High Tight Flag",
            SetupKind::GapUp => "Gap Up",
            SetupKind::VcpBreakout => "VCP Breakout",
        }
    }
}

/// A classified buy setup. Produced fresh each evaluation, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupResult {
    pub kind: SetupKind,
    /// The breakout trigger price: entry reference and stop-loss anchor.
    pub pivot_price: f64,
    /// Pivot minus the fixed 7% risk.
    pub stop_suggestion: f64,
    /// RS spread over the benchmark in percentage points.
    pub relative_strength: f64,
    pub rationale: String,
}

/// What a pattern reports when it fires.
#[derive(Debug, Clone)]
pub struct PatternMatch {
    pub kind: SetupKind,
    pub pivot_price: f64,
    pub rationale: String,
}

/// One entry pattern in the priority chain.
pub trait SetupPattern: Send + Sync {
    fn name(&self) -> &str;

    /// Evaluate the pattern at `i`. None means "did not fire" — whether
    /// because the predicate failed or because a window lacked data.
    fn evaluate(&self, bars: &[Bar], i: usize, indicators: &IndicatorValues)
        -> Option<PatternMatch>;
}

/// First-day breakout state shared by the flag and VCP patterns.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BreakoutCheck {
    /// Highest high over bars [i-20, i-1] — the prior 20 bars, excluding today.
    pub prev_high_20: f64,
    /// True only on the first close above that level.
    pub first_day: bool,
}

/// Compute the first-day breakout condition at `i`.
///
/// `prev_high_20` is the 20-bar rolling high queried at i-1, so the window
/// ends yesterday. Returns None until that window is seeded.
pub(crate) fn breakout_check(
    bars: &[Bar],
    i: usize,
    indicators: &IndicatorValues,
) -> Option<BreakoutCheck> {
    if i < 1 {
        return None;
    }
    let prev_high_20 = indicators.get_valid(MAX_HIGH_20, i - 1)?;
    let first_day = bars[i].close > prev_high_20 && bars[i - 1].close <= prev_high_20;
    Some(BreakoutCheck {
        prev_high_20,
        first_day,
    })
}

/// The classifier: hard filters in front of the ordered pattern chain.
pub struct SetupClassifier {
    profile: ScanProfile,
    patterns: Vec<Box<dyn SetupPattern>>,
}

impl SetupClassifier {
    pub fn new(profile: ScanProfile) -> Self {
        let patterns: Vec<Box<dyn SetupPattern>> = vec![
            Box::new(HighTightFlag::default()),
            Box::new(GapUp::default()),
            Box::new(VcpBreakout::default()),
        ];
        Self { profile, patterns }
    }

    pub fn profile(&self) -> &ScanProfile {
        &self.profile
    }

    /// RS spread in percentage points, or None while the ROC window is
    /// unseeded.
    pub fn relative_strength(
        &self,
        indicators: &IndicatorValues,
        i: usize,
        bench_roc: f64,
    ) -> Option<f64> {
        let stock_roc = indicators.get_valid(&roc_key(self.profile.rs_period), i)?;
        Some((stock_roc - bench_roc) * 100.0)
    }

    /// Classify the bar at `i`. At most one setup; evaluation is pure — the
    /// same inputs always produce the same answer.
    pub fn classify(
        &self,
        bars: &[Bar],
        i: usize,
        indicators: &IndicatorValues,
        bench_roc: f64,
    ) -> Option<SetupResult> {
        let rs = self.relative_strength(indicators, i, bench_roc)?;
        if !self.passes_filters(bars, i, indicators, rs) {
            return None;
        }

        for pattern in &self.patterns {
            if let Some(m) = pattern.evaluate(bars, i, indicators) {
                return Some(SetupResult {
                    kind: m.kind,
                    pivot_price: m.pivot_price,
                    stop_suggestion: m.pivot_price * PIVOT_STOP_RATIO,
                    relative_strength: rs,
                    rationale: m.rationale,
                });
            }
        }
        None
    }

    /// The hard filters: price floor, liquidity floor, Stage-2 trend, RS
    /// threshold. Any missing indicator fails the filter. Public because the
    /// momentum scan gates its accumulation signal on the same filters.
    pub fn passes_filters(
        &self,
        bars: &[Bar],
        i: usize,
        indicators: &IndicatorValues,
        rs: f64,
    ) -> bool {
        let close = bars[i].close;
        if close < self.profile.min_price {
            return false;
        }

        let avg_volume = match indicators.get_valid(AVG_VOLUME_20, i) {
            Some(v) => v,
            None => return false,
        };
        if avg_volume < self.profile.min_volume {
            return false;
        }

        // Stage 2: close > 50-bar MA > 200-bar MA, strictly.
        let (ma50, ma200) = match (
            indicators.get_valid(SMA_50, i),
            indicators.get_valid(SMA_200, i),
        ) {
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };
        if !(close > ma50 && ma50 > ma200) {
            return false;
        }

        rs >= self.profile.rs_threshold_pct
    }
}
