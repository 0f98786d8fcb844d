//! The scan driver — runs the whole universe through the engine.
//!
//! Each instrument is independent: fetch → validate → indicator battery →
//! classifier (+ accumulation detector for the momentum profile) → exit
//! ladder for held names. Instruments run in parallel under rayon; one
//! ticker's failure is recorded and never aborts the batch.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use pivotscan_core::domain::{BarSeries, ScanProfile};
use pivotscan_core::exits::ExitEngine;
use pivotscan_core::indicators::{Roc, SnapshotSet};
use pivotscan_core::setups::{AccumulationDetector, MvpSignal, SetupClassifier};

use crate::benchmark;
use crate::data::{ingest, BarCache, DataError, DataProvider};
use crate::fingerprint;
use crate::portfolio::Portfolio;
use crate::universe::{StockInfo, Universe};

/// How many top industries get the leader mark in the momentum scan.
const LEADER_INDUSTRIES: usize = 3;

/// Configuration for one scan run. Serializable so the run can be
/// fingerprinted and reproduced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub benchmark: String,
    pub chose: ScanProfile,
    pub drive: ScanProfile,
    /// First bar requested from providers.
    pub start: NaiveDate,
    /// Evaluation date (the most recent session).
    pub end: NaiveDate,
}

impl ScanConfig {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            benchmark: "0050.TW".into(),
            chose: ScanProfile::chose(),
            drive: ScanProfile::drive(),
            start,
            end,
        }
    }
}

/// A pattern-scan hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupRow {
    pub ticker: String,
    pub name: String,
    pub industry: String,
    pub price: f64,
    pub setup: String,
    pub pivot_price: f64,
    pub stop_suggestion: f64,
    pub relative_strength: f64,
    pub rationale: String,
    pub volume: u64,
}

/// A momentum-scan hit: a drive-profile setup, an accumulation signal, or both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveRow {
    pub ticker: String,
    pub name: String,
    pub industry: String,
    pub price: f64,
    pub relative_strength: f64,
    pub setup: Option<String>,
    pub accumulation: Option<MvpSignal>,
    /// Industry is among the top-ranked by hit count.
    pub leader: bool,
}

/// One held position's health-check verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRow {
    pub ticker: String,
    pub price: f64,
    pub cost: f64,
    pub r_multiple: f64,
    pub action: String,
    pub defense_price: f64,
    pub rationale: String,
}

/// A per-ticker failure, isolated from the rest of the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanError {
    pub ticker: String,
    pub message: String,
}

/// Everything one scan run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub date: NaiveDate,
    pub run_id: String,
    pub health: Vec<HealthRow>,
    pub chose: Vec<SetupRow>,
    pub drive: Vec<DriveRow>,
    /// Tickers confirmed by both scans.
    pub intersection: Vec<String>,
    /// The leading industries by momentum-scan hit count.
    pub leaders: Vec<String>,
    pub errors: Vec<ScanError>,
}

/// Progress reporting for long scans.
pub trait ScanProgress: Sync {
    fn on_ticker(&self, _ticker: &str, _index: usize, _total: usize) {}
    fn on_finish(&self, _hits: usize, _errors: usize, _total: usize) {}
}

/// Prints one line per ticker and a final summary.
pub struct StdoutProgress;

impl ScanProgress for StdoutProgress {
    fn on_ticker(&self, ticker: &str, index: usize, total: usize) {
        println!("[{}/{total}] {ticker}", index + 1);
    }

    fn on_finish(&self, hits: usize, errors: usize, total: usize) {
        println!("scan complete: {hits} hits, {errors} failures, {total} tickers");
    }
}

/// Silent progress for tests and library callers.
pub struct NullProgress;

impl ScanProgress for NullProgress {}

/// What one ticker contributed.
#[derive(Debug, Default)]
struct TickerOutcome {
    health: Option<HealthRow>,
    chose: Option<SetupRow>,
    drive: Option<DriveRow>,
}

/// Run the full scan.
pub fn run_scan(
    config: &ScanConfig,
    universe: &Universe,
    portfolio: &Portfolio,
    provider: &dyn DataProvider,
    cache: &BarCache,
    progress: &dyn ScanProgress,
) -> ScanReport {
    let mut errors = Vec::new();

    // One benchmark fetch serves both profiles. A missing benchmark
    // degrades to a neutral 0.0 instead of aborting the scan.
    let (bench_chose, bench_drive) =
        match fetch_series(provider, cache, &config.benchmark, config.start, config.end) {
            Ok(bench) => (
                benchmark::latest_roc(&bench, config.chose.rs_period),
                benchmark::latest_roc(&bench, config.drive.rs_period),
            ),
            Err(e) => {
                errors.push(ScanError {
                    ticker: config.benchmark.clone(),
                    message: e.to_string(),
                });
                (0.0, 0.0)
            }
        };

    let classifier_chose = SetupClassifier::new(config.chose.clone());
    let classifier_drive = SetupClassifier::new(config.drive.clone());
    let accumulation = AccumulationDetector::default();
    let exit_engine = ExitEngine::new();

    let total = universe.len();
    let counter = AtomicUsize::new(0);

    let results: Vec<(String, Result<TickerOutcome, DataError>)> = universe
        .stocks
        .par_iter()
        .map(|stock| {
            let index = counter.fetch_add(1, Ordering::Relaxed);
            progress.on_ticker(&stock.ticker, index, total);
            let outcome = evaluate_ticker(
                stock,
                config,
                portfolio,
                provider,
                cache,
                &classifier_chose,
                &classifier_drive,
                &accumulation,
                &exit_engine,
                bench_chose,
                bench_drive,
            );
            (stock.ticker.clone(), outcome)
        })
        .collect();

    let mut health = Vec::new();
    let mut chose = Vec::new();
    let mut drive = Vec::new();

    for (ticker, result) in results {
        match result {
            Ok(outcome) => {
                health.extend(outcome.health);
                chose.extend(outcome.chose);
                drive.extend(outcome.drive);
            }
            Err(e) => errors.push(ScanError {
                ticker,
                message: e.to_string(),
            }),
        }
    }

    // Strongest names first.
    chose.sort_by(|a, b| {
        b.relative_strength
            .partial_cmp(&a.relative_strength)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    drive.sort_by(|a, b| {
        b.relative_strength
            .partial_cmp(&a.relative_strength)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let leaders = rank_leaders(&mut drive);

    let chose_tickers: HashSet<&str> = chose.iter().map(|r| r.ticker.as_str()).collect();
    let intersection: Vec<String> = drive
        .iter()
        .filter(|r| chose_tickers.contains(r.ticker.as_str()))
        .map(|r| r.ticker.clone())
        .collect();

    progress.on_finish(chose.len() + drive.len(), errors.len(), total);

    ScanReport {
        date: config.end,
        run_id: fingerprint::run_id(config),
        health,
        chose,
        drive,
        intersection,
        leaders,
        errors,
    }
}

/// Rank industries by hit count, mark rows in the top ones, and return the
/// ranked industry names.
fn rank_leaders(rows: &mut [DriveRow]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows.iter() {
        *counts.entry(row.industry.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let leaders: Vec<String> = ranked
        .into_iter()
        .take(LEADER_INDUSTRIES)
        .map(|(industry, _)| industry.to_string())
        .collect();

    for row in rows.iter_mut() {
        row.leader = leaders.iter().any(|l| *l == row.industry);
    }
    leaders
}

/// Fetch a symbol's bars, preferring a fresh cache, falling back to a stale
/// cache when the provider fails.
fn fetch_series(
    provider: &dyn DataProvider,
    cache: &BarCache,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<BarSeries, DataError> {
    let raw = if cache.is_fresh(symbol, end) {
        cache.load(symbol)?.unwrap_or_default()
    } else {
        match provider.fetch(symbol, start, end) {
            Ok(bars) => {
                cache.store(symbol, &bars)?;
                bars
            }
            Err(e) => cache.load(symbol)?.ok_or(e)?,
        }
    };
    ingest(symbol, raw)
}

#[allow(clippy::too_many_arguments)]
fn evaluate_ticker(
    stock: &StockInfo,
    config: &ScanConfig,
    portfolio: &Portfolio,
    provider: &dyn DataProvider,
    cache: &BarCache,
    classifier_chose: &SetupClassifier,
    classifier_drive: &SetupClassifier,
    accumulation: &AccumulationDetector,
    exit_engine: &ExitEngine,
    bench_chose: f64,
    bench_drive: f64,
) -> Result<TickerOutcome, DataError> {
    let series = fetch_series(provider, cache, &stock.ticker, config.start, config.end)?;
    let bars = series.bars();
    let i = series.last_index();

    let snapshots = SnapshotSet::build(&series, config.chose.rs_period);
    let values = snapshots.values();

    let mut outcome = TickerOutcome::default();

    // Portfolio health check first — it runs even for names that fail every
    // scan filter.
    if let Some(holding) = portfolio.holding_for(&stock.ticker) {
        let decision = exit_engine.evaluate(&holding, bars, i, values);
        outcome.health = Some(HealthRow {
            ticker: stock.ticker.clone(),
            price: bars[i].close,
            cost: holding.entry_price,
            r_multiple: decision.r_multiple,
            action: decision.action.label().to_string(),
            defense_price: decision.defense_price,
            rationale: decision.rationale.join(" | "),
        });
    }

    // Pattern scan.
    if let Some(setup) = classifier_chose.classify(bars, i, values, bench_chose) {
        outcome.chose = Some(SetupRow {
            ticker: stock.ticker.clone(),
            name: stock.name.clone(),
            industry: stock.industry.clone(),
            price: bars[i].close,
            setup: setup.kind.label().to_string(),
            pivot_price: setup.pivot_price,
            stop_suggestion: setup.stop_suggestion,
            relative_strength: setup.relative_strength,
            rationale: setup.rationale,
            volume: bars[i].volume,
        });
    }

    // Momentum scan: the drive profile needs its own ROC period on top of
    // the standard battery.
    let mut values_drive = values.clone();
    values_drive.compute_and_insert(&Roc::new(config.drive.rs_period), bars);

    if let Some(rs) = classifier_drive.relative_strength(&values_drive, i, bench_drive) {
        if classifier_drive.passes_filters(bars, i, &values_drive, rs) {
            let setup = classifier_drive.classify(bars, i, &values_drive, bench_drive);
            let mvp = accumulation.evaluate(bars, i);
            if setup.is_some() || mvp.is_some() {
                outcome.drive = Some(DriveRow {
                    ticker: stock.ticker.clone(),
                    name: stock.name.clone(),
                    industry: stock.industry.clone(),
                    price: bars[i].close,
                    relative_strength: rs,
                    setup: setup.map(|s| s.kind.label().to_string()),
                    accumulation: mvp,
                    leader: false,
                });
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serves canned bars per symbol; unknown symbols fail.
    struct FixtureProvider {
        bars: HashMap<String, Vec<crate::data::RawBar>>,
        calls: Mutex<Vec<String>>,
    }

    impl FixtureProvider {
        fn new() -> Self {
            Self {
                bars: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_series(mut self, symbol: &str, closes: &[f64], spike_at: Option<usize>) -> Self {
            let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
            let bars = closes
                .iter()
                .enumerate()
                .map(|(i, &close)| crate::data::RawBar {
                    date: base + chrono::Duration::days(i as i64),
                    open: close - 0.05,
                    high: close + 0.05,
                    low: close - 0.1,
                    close,
                    volume: if spike_at == Some(i) { 2_000_000 } else { 1_000_000 },
                })
                .collect();
            self.bars.insert(symbol.to_string(), bars);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl DataProvider for FixtureProvider {
        fn name(&self) -> &str {
            "fixture"
        }

        fn fetch(
            &self,
            symbol: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<crate::data::RawBar>, DataError> {
            self.calls.lock().unwrap().push(symbol.to_string());
            self.bars
                .get(symbol)
                .cloned()
                .ok_or_else(|| DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                })
        }
    }

    fn uptrend(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 0.1).collect()
    }

    fn test_universe() -> Universe {
        Universe {
            stocks: vec![
                StockInfo {
                    ticker: "AAAA.TW".into(),
                    name: "Alpha".into(),
                    industry: "Semiconductors".into(),
                },
                StockInfo {
                    ticker: "BBBB.TW".into(),
                    name: "Beta".into(),
                    industry: "Shipping".into(),
                },
            ],
        }
    }

    fn test_config() -> ScanConfig {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let end = start + chrono::Duration::days(300);
        ScanConfig::new(start, end)
    }

    #[test]
    fn one_failing_ticker_does_not_abort_the_batch() {
        let closes = uptrend(280);
        let provider = FixtureProvider::new()
            .with_series("0050.TW", &closes, None)
            .with_series("AAAA.TW", &closes, Some(279));
        // BBBB.TW is not served → SymbolNotFound

        let dir = tempfile::tempdir().unwrap();
        let cache = BarCache::new(dir.path());
        let report = run_scan(
            &test_config(),
            &test_universe(),
            &Portfolio::default(),
            &provider,
            &cache,
            &NullProgress,
        );

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].ticker, "BBBB.TW");
        // The served ticker fires a breakout on its engineered volume spike.
        assert_eq!(report.chose.len(), 1);
        assert_eq!(report.chose[0].ticker, "AAAA.TW");
        assert_eq!(report.chose[0].setup, "VCP Breakout");
    }

    #[test]
    fn health_rows_cover_held_names_only() {
        let closes = uptrend(280);
        let provider = FixtureProvider::new()
            .with_series("0050.TW", &closes, None)
            .with_series("AAAA.TW", &closes, None)
            .with_series("BBBB.TW", &closes, None);

        let portfolio = Portfolio::from_toml(
            r#"
            [holdings."AAAA.TW"]
            cost = 100.0
        "#,
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let cache = BarCache::new(dir.path());
        let report = run_scan(
            &test_config(),
            &test_universe(),
            &portfolio,
            &provider,
            &cache,
            &NullProgress,
        );

        assert_eq!(report.health.len(), 1);
        let row = &report.health[0];
        assert_eq!(row.ticker, "AAAA.TW");
        // Deep in profit on a steady uptrend: the advisory is partial profit.
        assert!(row.r_multiple > 3.0);
        assert_eq!(row.action, "partial-profit");
    }

    #[test]
    fn second_scan_hits_the_cache() {
        let closes = uptrend(280);
        let provider = FixtureProvider::new()
            .with_series("0050.TW", &closes, None)
            .with_series("AAAA.TW", &closes, None)
            .with_series("BBBB.TW", &closes, None);

        let dir = tempfile::tempdir().unwrap();
        let cache = BarCache::new(dir.path());

        let mut config = test_config();
        // End on the last served session so the cache counts as fresh.
        config.end = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + chrono::Duration::days(279);

        run_scan(
            &config,
            &test_universe(),
            &Portfolio::default(),
            &provider,
            &cache,
            &NullProgress,
        );
        let first_calls = provider.calls().len();
        assert_eq!(first_calls, 3);

        run_scan(
            &config,
            &test_universe(),
            &Portfolio::default(),
            &provider,
            &cache,
            &NullProgress,
        );
        assert_eq!(provider.calls().len(), first_calls); // no new fetches
    }

    #[test]
    fn run_id_is_stable_per_config() {
        let config = test_config();
        assert_eq!(
            fingerprint::run_id(&config),
            fingerprint::run_id(&config.clone())
        );
    }

    #[test]
    fn leader_ranking_marks_top_industries() {
        let mut rows: Vec<DriveRow> = [
            ("A", "Semiconductors"),
            ("B", "Semiconductors"),
            ("C", "Shipping"),
            ("D", "Steel"),
            ("E", "Food"),
        ]
        .iter()
        .map(|(t, industry)| DriveRow {
            ticker: format!("{t}.TW"),
            name: t.to_string(),
            industry: industry.to_string(),
            price: 100.0,
            relative_strength: 10.0,
            setup: None,
            accumulation: None,
            leader: false,
        })
        .collect();

        let leaders = rank_leaders(&mut rows);
        assert_eq!(leaders.len(), 3);
        assert_eq!(leaders[0], "Semiconductors");
        assert!(rows[0].leader && rows[1].leader);
        // Exactly the rows in the three leading industries are marked.
        assert_eq!(rows.iter().filter(|r| r.leader).count(), 4);
    }
}
