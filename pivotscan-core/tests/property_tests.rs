//! Property tests for engine invariants.
//!
//! 1. Hard-stop dominance — any close below entry × (1 - stop) exits as a
//!    hard stop, whatever the MAs say.
//! 2. Win-rate bounds — 0 ≤ win rate ≤ 100 for any trade list, 0 when every
//!    trade is non-positive.
//! 3. Compounding — total return equals the order-preserving product.
//! 4. Defense-price monotonicity — never below the hard stop.
//! 5. Classifier idempotence — re-evaluation returns the same result.

use chrono::NaiveDate;
use proptest::prelude::*;

use pivotscan_core::backtest::stats::{total_return_pct, win_rate_pct};
use pivotscan_core::domain::{Bar, Holding, ScanProfile, TradeRecord};
use pivotscan_core::exits::{ExitAction, ExitEngine, ExitReason};
use pivotscan_core::indicators::{IndicatorValues, SnapshotSet};
use pivotscan_core::setups::SetupClassifier;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 1_000_000,
        })
        .collect()
}

fn make_trade(return_pct: f64) -> TradeRecord {
    let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    TradeRecord {
        entry_bar: 0,
        entry_date: date,
        entry_price: 100.0,
        exit_bar: 1,
        exit_date: date + chrono::Duration::days(1),
        exit_price: 100.0 * (1.0 + return_pct),
        return_pct,
        setup: pivotscan_core::setups::SetupKind::VcpBreakout,
        exit_reason: ExitReason::MaBreak,
    }
}

// ── Strategies ───────────────────────────────────────────────────────

fn arb_entry_price() -> impl Strategy<Value = f64> {
    (20.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_returns() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.5..0.5_f64, 0..40)
}

proptest! {
    /// Hard stop dominance: close under the stop always exits as hard-stop,
    /// regardless of where the moving averages sit.
    #[test]
    fn hard_stop_always_dominates(
        entry in arb_entry_price(),
        stop_frac in 0.01..0.20_f64,
        below in 0.001..0.20_f64,
        ma_level in 10.0..1000.0_f64,
    ) {
        let close = entry * (1.0 - stop_frac) * (1.0 - below);
        let bars = make_bars(&vec![close; 40]);
        let mut iv = IndicatorValues::new();
        iv.insert("sma_10", vec![ma_level; 40]);
        iv.insert("sma_20", vec![ma_level; 40]);

        let holding = Holding::new(entry, stop_frac);
        let decision = ExitEngine::new().evaluate(&holding, &bars, 39, &iv);
        prop_assert_eq!(decision.action, ExitAction::Exit(ExitReason::HardStop));
    }

    /// The defense price is never looser than the hard stop.
    #[test]
    fn defense_price_at_least_hard_stop(
        entry in arb_entry_price(),
        close_mult in 0.5..2.0_f64,
        ma_level in 10.0..1000.0_f64,
    ) {
        let close = entry * close_mult;
        let bars = make_bars(&vec![close; 40]);
        let mut iv = IndicatorValues::new();
        iv.insert("sma_10", vec![ma_level; 40]);
        iv.insert("sma_20", vec![ma_level; 40]);

        let holding = Holding::new(entry, 0.07);
        let decision = ExitEngine::new().evaluate(&holding, &bars, 39, &iv);
        prop_assert!(decision.defense_price >= holding.hard_stop() - 1e-9);
    }

    /// Win rate is bounded to [0, 100].
    #[test]
    fn win_rate_is_bounded(returns in arb_returns()) {
        let trades: Vec<TradeRecord> = returns.iter().map(|&r| make_trade(r)).collect();
        let rate = win_rate_pct(&trades);
        prop_assert!((0.0..=100.0).contains(&rate));
    }

    /// Win rate is zero when no trade has a positive return.
    #[test]
    fn win_rate_zero_without_winners(returns in prop::collection::vec(-0.5..=0.0_f64, 1..40)) {
        let trades: Vec<TradeRecord> = returns.iter().map(|&r| make_trade(r)).collect();
        prop_assert_eq!(win_rate_pct(&trades), 0.0);
    }

    /// Total return equals the direct product over (1 + r).
    #[test]
    fn compounding_matches_product(returns in arb_returns()) {
        let trades: Vec<TradeRecord> = returns.iter().map(|&r| make_trade(r)).collect();
        let expected = if returns.is_empty() {
            0.0
        } else {
            (returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0) * 100.0
        };
        let actual = total_return_pct(&trades);
        prop_assert!((actual - expected).abs() < 1e-9);
    }

    /// Classifying the same index twice yields the same answer — no hidden
    /// state in the classifier.
    #[test]
    fn classification_is_idempotent(
        seed_prices in prop::collection::vec(50.0..150.0_f64, 300..320),
        bench_roc in -0.2..0.2_f64,
    ) {
        let bars = make_bars(&seed_prices);
        let series = pivotscan_core::domain::BarSeries::new("T", bars.clone()).unwrap();
        let snapshots = SnapshotSet::build(&series, 20);
        let classifier = SetupClassifier::new(ScanProfile::chose());

        let i = series.last_index();
        let first = classifier.classify(series.bars(), i, snapshots.values(), bench_roc);
        let second = classifier.classify(series.bars(), i, snapshots.values(), bench_roc);
        prop_assert_eq!(first, second);
    }
}
