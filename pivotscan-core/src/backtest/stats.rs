//! Trade statistics — pure functions, trade list in, scalar out.

use serde::{Deserialize, Serialize};

use crate::domain::TradeRecord;

/// Aggregate results for one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub trade_count: usize,
    pub win_rate_pct: f64,
    pub total_return_pct: f64,
}

impl BacktestSummary {
    pub fn from_trades(trades: &[TradeRecord]) -> Self {
        Self {
            trade_count: trades.len(),
            win_rate_pct: win_rate_pct(trades),
            total_return_pct: total_return_pct(trades),
        }
    }
}

/// Share of trades with a strictly positive return, in percent.
/// Zero trades → 0.0.
pub fn win_rate_pct(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64 * 100.0
}

/// Compounded total return over the chronological trade sequence, in percent.
/// Zero trades → 0.0.
pub fn total_return_pct(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let product: f64 = trades.iter().map(|t| 1.0 + t.return_pct).product();
    (product - 1.0) * 100.0
}
