//! Recorded candles used as an offline market data source.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SNAPSHOT_VERSION;
use crate::data::source::MarketDataSource;
use crate::domain::{Candle, PriceSeries, Timeframe};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct SnapshotSeries {
    symbol: String,
    timeframe: Timeframe,
    candles: Vec<Candle>,
}

/// Serialized form: a flat list of series, since JSON object keys can't be tuples.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct SnapshotFile {
    version: f64,
    captured_at_ms: i64,
    series: Vec<SnapshotSeries>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandleSnapshot {
    captured_at_ms: i64,
    series: BTreeMap<(String, Timeframe), Vec<Candle>>,
}

impl CandleSnapshot {
    pub fn new(captured_at_ms: i64) -> Self {
        Self {
            captured_at_ms,
            series: BTreeMap::new(),
        }
    }

    pub fn captured_now() -> Self {
        Self::new(Utc::now().timestamp_millis())
    }

    pub fn insert(&mut self, series: PriceSeries) {
        self.series
            .insert((series.symbol, series.timeframe), series.candles);
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.insert(series);
        self
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn captured_at_ms(&self) -> i64 {
        self.captured_at_ms
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_file()).context("Failed to serialize snapshot")
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let file: SnapshotFile =
            serde_json::from_str(text).context("Failed to deserialize snapshot")?;
        Self::from_file(file)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open snapshot: {:?}", path))?;
        let reader = BufReader::new(file);
        let snapshot: SnapshotFile = serde_json::from_reader(reader)
            .context(format!("Failed to deserialize snapshot: {:?}", path))?;
        Self::from_file(snapshot)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        let file =
            File::create(path).context(format!("Failed to create file: {}", path.display()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.to_file())
            .context(format!("Failed to serialize snapshot to: {}", path.display()))
    }

    fn to_file(&self) -> SnapshotFile {
        SnapshotFile {
            version: SNAPSHOT_VERSION,
            captured_at_ms: self.captured_at_ms,
            series: self
                .series
                .iter()
                .map(|((symbol, timeframe), candles)| SnapshotSeries {
                    symbol: symbol.clone(),
                    timeframe: *timeframe,
                    candles: candles.clone(),
                })
                .collect(),
        }
    }

    fn from_file(file: SnapshotFile) -> Result<Self> {
        if file.version != SNAPSHOT_VERSION {
            bail!(
                "Snapshot version mismatch: file v{} vs required v{}",
                file.version,
                SNAPSHOT_VERSION
            );
        }
        let mut snapshot = CandleSnapshot::new(file.captured_at_ms);
        for s in file.series {
            snapshot.insert(PriceSeries::new(s.symbol, s.timeframe, s.candles));
        }
        Ok(snapshot)
    }
}

impl MarketDataSource for CandleSnapshot {
    fn signature(&self) -> &'static str {
        "Candle snapshot"
    }

    fn as_of(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.captured_at_ms).unwrap_or_else(Utc::now)
    }

    fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries> {
        let (start_ms, end_ms) = (start.timestamp_millis(), end.timestamp_millis());
        let candles = self
            .series
            .get(&(symbol.to_string(), timeframe))
            .map(|candles| {
                candles
                    .iter()
                    .filter(|c| (start_ms..=end_ms).contains(&c.open_time_ms))
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        Ok(PriceSeries::new(symbol, timeframe, candles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CandleSnapshot {
        CandleSnapshot::new(10 * 86_400_000)
            .with_series(PriceSeries::from_closes(
                "EURUSD",
                Timeframe::D1,
                &[1.10, 1.11, 1.12],
            ))
            .with_series(PriceSeries::from_closes("EURUSD", Timeframe::H4, &[1.0]))
    }

    #[test]
    fn serves_candles_inside_the_window_only() {
        let snap = sample();
        let start = DateTime::from_timestamp_millis(86_400_000).unwrap();
        let series = snap
            .fetch_candles("EURUSD", Timeframe::D1, start, snap.as_of())
            .unwrap();
        assert_eq!(series.closes(), vec![1.11, 1.12]);
    }

    #[test]
    fn unknown_series_is_empty_not_an_error() {
        let snap = sample();
        let series = snap
            .fetch_candles("GBPUSD", Timeframe::D1, DateTime::<Utc>::UNIX_EPOCH, snap.as_of())
            .unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn json_round_trip_preserves_series_and_capture_time() {
        let snap = sample();
        let restored = CandleSnapshot::from_json(&snap.to_json().unwrap()).unwrap();
        assert_eq!(restored, snap);
        assert_eq!(restored.as_of().timestamp_millis(), 10 * 86_400_000);
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let text = r#"{"version": 99.0, "captured_at_ms": 0, "series": []}"#;
        assert!(CandleSnapshot::from_json(text).is_err());
    }
}
