//! High tight flag — a near-vertical rally that refuses to give much back.
//!
//! Rally: low-to-high move over the trailing 60 bars above 80%.
//! Pullback: give-back from that high below 25%.
//! Trigger: the first close above the prior 20-bar high.

use crate::domain::Bar;
use crate::indicators::snapshot::{MAX_HIGH_60, MIN_CLOSE_60};
use crate::indicators::IndicatorValues;

use super::{breakout_check, PatternMatch, SetupKind, SetupPattern};

#[derive(Debug, Clone)]
pub struct HighTightFlag {
    /// Minimum 60-bar rally as a fraction (0.80 = 80%).
    pub min_rally: f64,
    /// Maximum pullback from the 60-bar high as a fraction.
    pub max_pullback: f64,
}

impl HighTightFlag {
    pub fn new(min_rally: f64, max_pullback: f64) -> Self {
        assert!(min_rally > 0.0, "min_rally must be positive");
        assert!(
            max_pullback > 0.0 && max_pullback < 1.0,
            "max_pullback must be in (0, 1)"
        );
        Self {
            min_rally,
            max_pullback,
        }
    }
}

impl Default for HighTightFlag {
    fn default() -> Self {
        Self::new(0.80, 0.25)
    }
}

impl SetupPattern for HighTightFlag {
    fn name(&self) -> &str {
        "high_tight_flag"
    }

    fn evaluate(
        &self,
        bars: &[Bar],
        i: usize,
        indicators: &IndicatorValues,
    ) -> Option<PatternMatch> {
        let high_60 = indicators.get_valid(MAX_HIGH_60, i)?;
        let low_close_60 = indicators.get_valid(MIN_CLOSE_60, i)?;
        let close = bars[i].close;

        let rally = (high_60 - low_close_60) / low_close_60;
        let pullback = (high_60 - close) / high_60;
        if rally <= self.min_rally || pullback >= self.max_pullback {
            return None;
        }

        let check = breakout_check(bars, i, indicators)?;
        if !check.first_day {
            return None;
        }

        Some(PatternMatch {
            kind: SetupKind::HighTightFlag,
            pivot_price: check.prev_high_20,
            rationale: format!(
                "rallied {:.0}% in 60 bars, pulled back only {:.0}%, first close above the 20-bar high {:.2}",
                rally * 100.0,
                pullback * 100.0,
                check.prev_high_20
            ),
        })
    }
}
