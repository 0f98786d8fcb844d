//! PivotScan Core — bar series, indicators, setup classification, exit rules, backtest.
//!
//! This crate contains the strategy engine:
//! - Domain types (bars, validated series, scan profiles, holdings, trades)
//! - Indicator engine (SMA, rate of change, rolling extremes, volume averages)
//! - Setup classifier: hard filters plus an ordered pattern chain
//!   (high tight flag → gap up → VCP breakout), first match wins
//! - Exit rule ladder (hard stop, breakeven lock, scale-out flag, MA trailing stop)
//! - Bar-by-bar backtest runner with win-rate and compounded-return stats
//!
//! The crate is purely sequential and does no I/O. Data fetching, universe
//! resolution, report rendering, and email delivery live in `pivotscan-runner`.

pub mod backtest;
pub mod domain;
pub mod exits;
pub mod indicators;
pub mod setups;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types that cross the rayon scan boundary are Send + Sync.
    ///
    /// The runner evaluates instruments in parallel; every value handed across
    /// that boundary must satisfy these bounds or the scan driver won't build.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::BarSeries>();
        require_sync::<domain::BarSeries>();
        require_send::<domain::ScanProfile>();
        require_sync::<domain::ScanProfile>();
        require_send::<domain::Holding>();
        require_sync::<domain::Holding>();
        require_send::<domain::TradeRecord>();
        require_sync::<domain::TradeRecord>();

        require_send::<indicators::IndicatorValues>();
        require_sync::<indicators::IndicatorValues>();
        require_send::<indicators::SnapshotSet>();
        require_sync::<indicators::SnapshotSet>();

        require_send::<setups::SetupClassifier>();
        require_sync::<setups::SetupClassifier>();
        require_send::<setups::SetupResult>();
        require_sync::<setups::SetupResult>();

        require_send::<exits::ExitEngine>();
        require_sync::<exits::ExitEngine>();
        require_send::<exits::ExitDecision>();
        require_sync::<exits::ExitDecision>();

        require_send::<backtest::BacktestRunner>();
        require_sync::<backtest::BacktestRunner>();
        require_send::<backtest::BacktestReport>();
        require_sync::<backtest::BacktestReport>();
    }
}
