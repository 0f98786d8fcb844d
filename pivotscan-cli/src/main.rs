//! PivotScan CLI — scan, backtest, and download commands.
//!
//! Commands:
//! - `scan` — screen the universe, health-check the portfolio, render the
//!   daily report, optionally email it
//! - `backtest` — replay the classifier and exit ladder over one symbol's
//!   history and save the result artifact
//! - `download` — prefetch bars into the CSV cache

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use pivotscan_core::backtest::BacktestRunner;
use pivotscan_core::domain::ScanProfile;
use pivotscan_runner::benchmark;
use pivotscan_runner::data::{ingest, BarCache, DataProvider, YahooProvider};
use pivotscan_runner::mail::{send_report, MailConfig};
use pivotscan_runner::portfolio::Portfolio;
use pivotscan_runner::report::{render_html, render_markdown};
use pivotscan_runner::scan::{run_scan, ScanConfig, StdoutProgress};
use pivotscan_runner::settings::ScanSettings;
use pivotscan_runner::universe::Universe;
use pivotscan_runner::fingerprint;

#[derive(Parser)]
#[command(name = "pivotscan", about = "PivotScan — buy-setup screener and exit-rule health check")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen the universe and health-check the portfolio.
    Scan {
        /// Settings TOML file. Flags below override its fields.
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Universe TOML file. Defaults to the built-in sample universe.
        #[arg(long)]
        universe: Option<PathBuf>,

        /// Portfolio TOML file for the health check.
        #[arg(long)]
        portfolio: Option<PathBuf>,

        /// Cache directory. Defaults to ./data.
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Write the HTML report to this path.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Send the HTML report by email (needs GMAIL_USER,
        /// GMAIL_APP_PASSWORD, RECEIVER_EMAIL).
        #[arg(long, default_value_t = false)]
        email: bool,
    },
    /// Replay one symbol through the classifier and exit ladder.
    Backtest {
        /// Symbol to replay (e.g. 2330.TW).
        #[arg(long)]
        symbol: String,

        /// Scan profile: chose or drive.
        #[arg(long, default_value = "chose")]
        profile: String,

        /// Start date (YYYY-MM-DD). Defaults to 5 years ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Benchmark symbol for the RS filter.
        #[arg(long, default_value = "0050.TW")]
        benchmark: String,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,

        /// Output directory for the result JSON.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Prefetch bars into the CSV cache.
    Download {
        /// Symbols to download (e.g. 2330.TW 2454.TW).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 2 years ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Scan {
            settings,
            universe,
            portfolio,
            cache_dir,
            output,
            email,
        } => cmd_scan(settings, universe, portfolio, cache_dir, output, email),
        Commands::Backtest {
            symbol,
            profile,
            start,
            end,
            benchmark,
            cache_dir,
            output_dir,
        } => cmd_backtest(symbol, profile, start, end, benchmark, cache_dir, output_dir),
        Commands::Download {
            symbols,
            start,
            end,
            cache_dir,
        } => cmd_download(symbols, start, end, cache_dir),
    }
}

fn cmd_scan(
    settings_path: Option<PathBuf>,
    universe_path: Option<PathBuf>,
    portfolio_path: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    email: bool,
) -> Result<()> {
    let mut settings = match settings_path {
        Some(path) => ScanSettings::from_file(&path).map_err(anyhow::Error::msg)?,
        None => ScanSettings::default(),
    };
    if let Some(path) = universe_path {
        settings.universe = Some(path);
    }
    if let Some(path) = portfolio_path {
        settings.portfolio = Some(path);
    }
    if let Some(dir) = cache_dir {
        settings.cache_dir = dir;
    }

    let universe = match &settings.universe {
        Some(path) => Universe::from_file(path).map_err(anyhow::Error::msg)?,
        None => Universe::default_tw(),
    };
    let portfolio = match &settings.portfolio {
        Some(path) => Portfolio::from_file(path).map_err(anyhow::Error::msg)?,
        None => Portfolio::default(),
    };

    let end = today();
    // Roughly 250 trading days plus sub-window buffer, in calendar days.
    let start = end - chrono::Duration::days(550);
    let mut config = ScanConfig::new(start, end);
    config.benchmark = settings.benchmark.clone();

    let provider = YahooProvider::new();
    let cache = BarCache::new(&settings.cache_dir);

    println!(
        "scanning {} tickers against {}...",
        universe.len(),
        config.benchmark
    );
    let report = run_scan(
        &config,
        &universe,
        &portfolio,
        &provider,
        &cache,
        &StdoutProgress,
    );

    println!("\n{}", render_markdown(&report));

    let html = render_html(&report);
    if let Some(path) = &output {
        std::fs::write(path, &html)
            .with_context(|| format!("write report to {}", path.display()))?;
        println!("report written to {}", path.display());
    }

    if email {
        let mail = MailConfig::from_env()?;
        let subject = format!("Daily stock strategy report - {}", report.date);
        send_report(&mail, &subject, html)?;
        println!("report emailed to {}", mail.to);
    }

    Ok(())
}

/// Serializable backtest configuration; its hash names the result artifact.
#[derive(Serialize)]
struct BacktestArtifactConfig<'a> {
    symbol: &'a str,
    profile: &'a ScanProfile,
    benchmark: &'a str,
    start: NaiveDate,
    end: NaiveDate,
}

fn cmd_backtest(
    symbol: String,
    profile_name: String,
    start: Option<String>,
    end: Option<String>,
    benchmark_symbol: String,
    cache_dir: PathBuf,
    output_dir: PathBuf,
) -> Result<()> {
    let profile = match profile_name.as_str() {
        "chose" => ScanProfile::chose(),
        "drive" => ScanProfile::drive(),
        other => bail!("unknown profile '{other}' (expected chose or drive)"),
    };

    let end = parse_date_or(end, today())?;
    let start = parse_date_or(start, end - chrono::Duration::days(5 * 365))?;
    if start >= end {
        bail!("start date must be before end date");
    }

    let provider = YahooProvider::new();
    let cache = BarCache::new(&cache_dir);

    let series = ingest(&symbol, fetch_cached(&provider, &cache, &symbol, start, end)?)?;
    println!("{}: {} bars loaded", symbol, series.len());

    let bench_roc = match fetch_cached(&provider, &cache, &benchmark_symbol, start, end) {
        Ok(raw) => {
            let bench = ingest(&benchmark_symbol, raw)?;
            let dates: Vec<NaiveDate> = series.bars().iter().map(|b| b.date).collect();
            Some(benchmark::aligned_roc(&bench, profile.rs_period, &dates))
        }
        Err(e) => {
            eprintln!("benchmark {benchmark_symbol} unavailable ({e}); using neutral RS");
            None
        }
    };

    let runner = BacktestRunner::new(profile.clone());
    let report = runner.run(&series, bench_roc.as_deref());

    println!(
        "\n{} [{}] {} trades | win rate {:.1}% | total return {:+.1}%",
        report.symbol,
        report.profile,
        report.summary.trade_count,
        report.summary.win_rate_pct,
        report.summary.total_return_pct
    );
    for trade in &report.trades {
        println!(
            "  {} -> {}  {:>7.2} -> {:>7.2}  {:+6.2}%  {} / {}",
            trade.entry_date,
            trade.exit_date,
            trade.entry_price,
            trade.exit_price,
            trade.return_pct * 100.0,
            trade.setup.label(),
            trade.exit_reason.as_str()
        );
    }

    let artifact_config = BacktestArtifactConfig {
        symbol: &symbol,
        profile: &profile,
        benchmark: &benchmark_symbol,
        start,
        end,
    };
    let run_id = fingerprint::run_id(&artifact_config);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;
    let path = output_dir.join(format!("{run_id}.json"));
    let json = serde_json::to_string_pretty(&report).context("serialize backtest report")?;
    std::fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    println!("\nresult saved to {}", path.display());

    Ok(())
}

fn cmd_download(
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    cache_dir: PathBuf,
) -> Result<()> {
    let end = parse_date_or(end, today())?;
    let start = parse_date_or(start, end - chrono::Duration::days(2 * 365))?;

    let provider = YahooProvider::new();
    let cache = BarCache::new(&cache_dir);

    let total = symbols.len();
    let mut failed = 0;
    for (i, symbol) in symbols.iter().enumerate() {
        print!("[{}/{total}] {symbol} ... ", i + 1);
        match provider.fetch(symbol, start, end) {
            Ok(bars) => {
                cache.store(symbol, &bars)?;
                println!("{} bars", bars.len());
            }
            Err(e) => {
                failed += 1;
                println!("failed: {e}");
            }
        }
    }

    if failed > 0 {
        bail!("{failed}/{total} symbols failed to download");
    }
    println!("all {total} symbols cached under {}", cache.dir().display());
    Ok(())
}

/// Load from the cache when fresh, otherwise fetch and store.
fn fetch_cached(
    provider: &dyn DataProvider,
    cache: &BarCache,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<pivotscan_runner::data::RawBar>> {
    if cache.is_fresh(symbol, end) {
        if let Some(bars) = cache.load(symbol)? {
            return Ok(bars);
        }
    }
    let bars = provider.fetch(symbol, start, end)?;
    cache.store(symbol, &bars)?;
    Ok(bars)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn parse_date_or(input: Option<String>, default: NaiveDate) -> Result<NaiveDate> {
    match input {
        Some(text) => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{text}' (expected YYYY-MM-DD)")),
        None => Ok(default),
    }
}
