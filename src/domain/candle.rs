use serde::{Deserialize, Serialize};

use crate::domain::timeframe::Timeframe;

// Only the close (and its ordering) feeds the RSI; the open time is kept so a
// series can be checked for chronological order and written to snapshots.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub open_time_ms: i64,
    pub close: f64,
}

impl Candle {
    pub fn new(open_time_ms: i64, close: f64) -> Self {
        Candle {
            open_time_ms,
            close,
        }
    }
}

/// Chronologically ordered candles for one symbol + timeframe query.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub candles: Vec<Candle>,
}

impl PriceSeries {
    /// Builds a series, sorting by open time so EMA input is always chronological.
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, mut candles: Vec<Candle>) -> Self {
        if !candles.is_sorted_by_key(|c| c.open_time_ms) {
            candles.sort_by_key(|c| c.open_time_ms);
        }
        PriceSeries {
            symbol: symbol.into(),
            timeframe,
            candles,
        }
    }

    pub fn empty(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self::new(symbol, timeframe, Vec::new())
    }

    /// Test/demo helper: closes spaced one bar apart starting at t=0.
    pub fn from_closes(symbol: impl Into<String>, timeframe: Timeframe, closes: &[f64]) -> Self {
        let bar_ms = timeframe.minutes() * 60_000;
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle::new(i as i64 * bar_ms, close))
            .collect();
        Self::new(symbol, timeframe, candles)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}
