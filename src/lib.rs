#![allow(clippy::collapsible_if)]
#![allow(clippy::nonminimal_bool)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod errors;
pub mod report;

// Re-export commonly used types
pub use analysis::{BetSizer, RecommendationScore, RsiEngine, Scorer, aggregate, compute_rsi};
pub use config::{ScanFile, ScanSettings};
pub use data::{BinanceSession, CandleSnapshot, MarketDataSource};
pub use domain::{Candle, PriceSeries, Symbol, Timeframe, TimeframeSpec};
pub use errors::{RecommenderError, RecommenderResult};
pub use report::{Report, ReportBuilder};

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON scan configuration (symbols, timeframes, RSI settings)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read candles from a snapshot file instead of the Binance API
    #[arg(long)]
    pub candles: Option<PathBuf>,

    /// RSI smoothing window, overrides the config file
    #[arg(long)]
    pub rsi_window: Option<usize>,

    /// RSI oversold level
    #[arg(long)]
    pub rsi_low: Option<f64>,

    /// RSI overbought level
    #[arg(long)]
    pub rsi_high: Option<f64>,

    /// How many days of candles to request per timeframe
    #[arg(long)]
    pub lookback_days: Option<i64>,

    /// Do not log a warning for every missing (symbol, timeframe) cell
    #[arg(long, default_value_t = false)]
    pub ignore_warnings: bool,

    /// Drop timeframe columns that have no data for any symbol
    #[arg(long, default_value_t = false)]
    pub hide_empty_timeframes: bool,

    /// Evaluate symbols on the rayon thread pool
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Account balance; adds a BET column sized from the buy factor
    #[arg(long)]
    pub balance: Option<f64>,

    /// Plain table without ANSI colors
    #[arg(long, default_value_t = false)]
    pub no_color: bool,
}

/// Checks the source can serve every configured timeframe, then builds the report.
pub fn scan(
    source: &dyn MarketDataSource,
    builder: &ReportBuilder,
    settings: &ScanSettings,
) -> RecommenderResult<Report> {
    data::check_supported(source, &settings.timeframes)?;
    Ok(builder.build(source, &settings.symbols, &settings.timeframes))
}

/// Resolves configuration, opens the market-data source, prints the table.
pub fn run(args: &Cli) -> Result<()> {
    let started = Instant::now();

    let file = match &args.config {
        Some(path) => ScanFile::load(path)
            .with_context(|| format!("Failed to load scan config {:?}", path))?,
        None => ScanFile::default(),
    };
    let settings = ScanSettings::resolve(file, args)?;
    let builder = ReportBuilder::from_settings(&settings)?;

    let report = match &args.candles {
        Some(path) => {
            let snapshot = CandleSnapshot::load_from_path(path)?;
            log::info!(
                "Loaded {} series from {:?} (captured {})",
                snapshot.len(),
                path,
                snapshot.as_of()
            );
            scan(&snapshot, &builder, &settings)?
        }
        None => {
            let session = BinanceSession::open()?;
            let report = scan(&session, &builder, &settings);
            session.close();
            report?
        }
    };

    println!("{}", report::render(&report, settings.color));
    log::info!(
        "Scanned {} symbol(s) in {:.2?}",
        report.rows.len(),
        started.elapsed()
    );
    Ok(())
}
