use anyhow::Result;
use chrono::{DateTime, Utc};
use itertools::Itertools;

use crate::domain::{PriceSeries, Timeframe, TimeframeSpec};
use crate::errors::{RecommenderError, RecommenderResult};

/// Supplies OHLC candles (only the close is used) for a symbol/timeframe/range.
///
/// Implementations must be shareable across threads: the report builder may
/// query symbols in parallel.
pub trait MarketDataSource: Sync {
    /// A unique identifier for this implementation (for logs).
    fn signature(&self) -> &'static str;

    /// Whether this source can serve `timeframe` at all.
    fn supports(&self, _timeframe: Timeframe) -> bool {
        true
    }

    /// Reference "now" for lookback windows. Live sources use the wall clock;
    /// recorded sources use their capture time.
    fn as_of(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Candles in `[start, end]`, chronologically ordered. An empty series is
    /// a valid answer; errors are per-query and never fatal to a run.
    fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries>;
}

/// Rejects configured timeframes the source cannot serve, before any fetch.
pub fn check_supported(
    source: &dyn MarketDataSource,
    timeframes: &[TimeframeSpec],
) -> RecommenderResult<()> {
    let unsupported: Vec<&str> = timeframes
        .iter()
        .filter(|spec| !source.supports(spec.timeframe))
        .map(|spec| spec.label())
        .collect();

    if unsupported.is_empty() {
        Ok(())
    } else {
        Err(RecommenderError::Configuration(format!(
            "{} cannot serve timeframe(s): {}",
            source.signature(),
            unsupported.iter().join(", ")
        )))
    }
}
