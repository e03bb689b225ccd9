use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Duration;
use clap::Parser;

use rsi_recommender::config::SNAPSHOT_PATH;
use rsi_recommender::data::check_supported;
use rsi_recommender::{BinanceSession, CandleSnapshot, MarketDataSource, ScanFile, ScanSettings};

/// Records the configured symbols x timeframes from Binance into a snapshot
/// file that `rsi-recommender --candles` can replay offline.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON scan configuration (symbols, timeframes, lookback)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file
    #[arg(long, default_value = SNAPSHOT_PATH)]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let args = Args::parse();
    build_snapshot(&args)
}

fn build_snapshot(args: &Args) -> Result<()> {
    let file = match &args.config {
        Some(path) => ScanFile::load(path)
            .with_context(|| format!("Failed to load scan config {:?}", path))?,
        None => ScanFile::default(),
    };
    let settings = ScanSettings::resolve(file, &Default::default())?;

    let session = BinanceSession::open()?;
    let result = record(&session, &settings);
    session.close();
    let snapshot = result?;

    snapshot.save_to_path(&args.output)?;
    println!(
        "✅ Snapshot written to {:?} with {} series.",
        args.output,
        snapshot.len()
    );
    Ok(())
}

fn record(session: &BinanceSession, settings: &ScanSettings) -> Result<CandleSnapshot> {
    check_supported(session, &settings.timeframes)?;
    let mut snapshot = CandleSnapshot::captured_now();
    let end = snapshot.as_of();
    let start = end
        .checked_sub_signed(Duration::days(settings.lookback_days))
        .context("lookback reaches before the earliest representable time")?;

    for symbol in &settings.symbols {
        for spec in &settings.timeframes {
            match session.fetch_candles(symbol.name(), spec.timeframe, start, end) {
                Ok(series) => {
                    log::info!("{} {}: {} candles", symbol.name(), spec.label(), series.len());
                    snapshot.insert(series);
                }
                Err(e) => log::warn!("{} {} skipped: {:#}", symbol.name(), spec.label(), e),
            }
        }
    }
    Ok(snapshot)
}
