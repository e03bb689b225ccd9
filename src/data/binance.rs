//! Live market data from the Binance spot REST API.
//!
//! The SDK is async; `BinanceSession` owns a private tokio runtime and blocks
//! on each request so the rest of the crate stays synchronous. Ranges are
//! paged backward from the end so the newest candle is always present. The
//! session is an explicit handle: `open()` connects and pings, `close()` tears
//! down.

pub mod bn_kline;

use std::time::Duration;

use anyhow::{Result, anyhow};
use binance_sdk::config::ConfigurationRestApi;
use binance_sdk::errors;
use binance_sdk::spot::{
    SpotRestApi,
    rest_api::{KlinesIntervalEnum, KlinesParams, RestApi},
};
use chrono::{DateTime, Utc};
use tokio::runtime::Runtime;

use crate::config::binance::{BINANCE, BinanceApiConfig};
use crate::data::source::MarketDataSource;
use crate::domain::{Candle, PriceSeries, Timeframe};
use crate::errors::{RecommenderError, RecommenderResult};
use bn_kline::{convert_klines, to_candles, try_interval_from_timeframe};

pub struct BinanceSession {
    runtime: Runtime,
    client: RestApi,
}

fn configure_binance_client() -> Result<RestApi> {
    let config = BinanceApiConfig::default();
    let rest_conf = ConfigurationRestApi::builder()
        .timeout(config.timeout_ms)
        .retries(config.retries)
        .backoff(config.backoff_ms)
        .build()?;
    Ok(SpotRestApi::production(rest_conf))
}

fn describe_connector_error(e: &anyhow::Error) -> String {
    match e.downcast_ref::<errors::ConnectorError>() {
        Some(errors::ConnectorError::ConnectorClientError(msg)) => {
            format!("Client error: check request parameters. {}", msg)
        }
        Some(errors::ConnectorError::TooManyRequestsError(msg)) => {
            format!("Rate limit exceeded. {}", msg)
        }
        Some(errors::ConnectorError::RateLimitBanError(msg)) => {
            format!("IP address banned due to excessive rate limits. {}", msg)
        }
        Some(errors::ConnectorError::ServerError { msg, status_code }) => {
            format!("Server error: {} (status code: {:?})", msg, status_code)
        }
        Some(errors::ConnectorError::NetworkError(msg)) => {
            format!("Network error: check your internet connection. {}", msg)
        }
        Some(errors::ConnectorError::BadRequestError(msg)) => {
            format!("Bad request: {}", msg)
        }
        Some(other) => format!("Unexpected connector error: {:?}", other),
        None => format!("{:#}", e),
    }
}

impl BinanceSession {
    pub fn open() -> RecommenderResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| RecommenderError::Initialization(format!("tokio runtime: {e}")))?;

        let client = runtime
            .block_on(async { configure_binance_client() })
            .map_err(|e| RecommenderError::Initialization(format!("client config: {e:#}")))?;

        runtime.block_on(client.ping()).map_err(|e| {
            RecommenderError::Initialization(format!(
                "Binance ping failed: {}",
                describe_connector_error(&e)
            ))
        })?;

        log::info!("Connected to Binance spot REST API");
        Ok(Self { runtime, client })
    }

    pub fn close(self) {
        self.runtime.shutdown_timeout(Duration::from_secs(1));
        log::debug!("Binance session closed");
    }

    /// Newest `klines_limit` klines opening at or before `end_ms`.
    async fn fetch_page(
        &self,
        symbol: &str,
        interval: KlinesIntervalEnum,
        end_ms: i64,
    ) -> Result<Vec<Candle>> {
        let params = KlinesParams::builder(symbol.to_string(), interval)
            .limit(BINANCE.limits.klines_limit)
            .end_time(Some(end_ms))
            .build()?;

        let response = self
            .client
            .klines(params)
            .await
            .map_err(|e| anyhow!("{} {}", symbol, describe_connector_error(&e)))?;
        let data = response.data().await?;
        let klines = convert_klines(data)
            .map_err(|e| anyhow::Error::new(e).context(format!("{} convert_klines failed", symbol)))?;
        Ok(to_candles(klines))
    }
}

/// Candles gathered by [`page_backward`].
#[derive(Debug, PartialEq)]
pub struct PagedCandles {
    /// Ascending, restricted to `[start_ms, end_ms]`
    pub candles: Vec<Candle>,
    /// The page cap was hit before reaching `start_ms`; the oldest part of
    /// the range is missing but the newest candles are present.
    pub truncated: bool,
}

/// Walks backward from `end_ms`, one page per call of `fetch(cursor)`, where
/// `fetch` returns the newest `limit` candles opening at or before `cursor`.
/// Stops at `start_ms`, at a short or empty page, or after `max_pages`.
pub fn page_backward<F>(
    start_ms: i64,
    end_ms: i64,
    limit: usize,
    max_pages: usize,
    mut fetch: F,
) -> Result<PagedCandles>
where
    F: FnMut(i64) -> Result<Vec<Candle>>,
{
    let mut pages: Vec<Vec<Candle>> = Vec::new();
    let mut cursor = end_ms;
    let mut reached_start = false;

    for _ in 0..max_pages {
        let page = fetch(cursor)?;
        let Some(first_open) = page.first().map(|c| c.open_time_ms) else {
            reached_start = true;
            break;
        };
        let short = page.len() < limit;
        pages.push(page);
        if short || first_open <= start_ms {
            reached_start = true;
            break;
        }
        cursor = first_open - 1;
    }

    let candles = pages
        .into_iter()
        .rev()
        .flatten()
        .filter(|c| (start_ms..=end_ms).contains(&c.open_time_ms))
        .collect();
    Ok(PagedCandles {
        candles,
        truncated: !reached_start,
    })
}

impl MarketDataSource for BinanceSession {
    fn signature(&self) -> &'static str {
        "Binance API"
    }

    fn supports(&self, timeframe: Timeframe) -> bool {
        try_interval_from_timeframe(timeframe).is_some()
    }

    fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries> {
        let interval = try_interval_from_timeframe(timeframe)
            .ok_or_else(|| anyhow!("Binance has no {} interval", timeframe))?;
        log::debug!("Fetching {} {} from {} to {}", symbol, timeframe, start, end);

        let paged = page_backward(
            start.timestamp_millis(),
            end.timestamp_millis(),
            BINANCE.limits.klines_limit as usize,
            BINANCE.limits.max_pages,
            |cursor| {
                self.runtime
                    .block_on(self.fetch_page(symbol, interval.clone(), cursor))
            },
        )?;
        if paged.truncated {
            log::warn!(
                "{} {}: page cap of {} reached, oldest candle served is {}",
                symbol,
                timeframe,
                BINANCE.limits.max_pages,
                paged
                    .candles
                    .first()
                    .and_then(|c| DateTime::from_timestamp_millis(c.open_time_ms))
                    .map_or_else(|| "n/a".to_string(), |t| t.to_string())
            );
        }
        Ok(PriceSeries::new(symbol, timeframe, paged.candles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN_MS: i64 = 60_000;

    // A market of one-minute candles opening at minutes 0..=9.
    fn market(cursor: i64, limit: usize) -> Vec<Candle> {
        if cursor < 0 {
            return Vec::new();
        }
        let last = (cursor / MIN_MS).min(9);
        let first = (last + 1 - limit as i64).max(0);
        (first..=last)
            .map(|m| Candle::new(m * MIN_MS, m as f64))
            .collect()
    }

    fn minutes(paged: &PagedCandles) -> Vec<i64> {
        paged.candles.iter().map(|c| c.open_time_ms / MIN_MS).collect()
    }

    #[test]
    fn whole_range_comes_back_ascending() {
        let mut calls = 0;
        let paged = page_backward(0, 9 * MIN_MS, 3, 10, |cursor| {
            calls += 1;
            Ok(market(cursor, 3))
        })
        .unwrap();
        assert_eq!(minutes(&paged), (0..=9).collect::<Vec<_>>());
        assert!(!paged.truncated);
        assert_eq!(calls, 4);
    }

    #[test]
    fn page_cap_keeps_the_newest_candles() {
        let paged = page_backward(0, 9 * MIN_MS, 3, 2, |cursor| Ok(market(cursor, 3))).unwrap();
        assert_eq!(minutes(&paged), vec![4, 5, 6, 7, 8, 9]);
        assert!(paged.truncated);
    }

    #[test]
    fn candles_before_start_are_dropped() {
        let paged =
            page_backward(5 * MIN_MS, 9 * MIN_MS, 3, 10, |cursor| Ok(market(cursor, 3))).unwrap();
        assert_eq!(minutes(&paged), vec![5, 6, 7, 8, 9]);
        assert!(!paged.truncated);
    }

    #[test]
    fn fetch_error_is_propagated() {
        let result = page_backward(0, 9 * MIN_MS, 3, 10, |_| Err(anyhow!("rate limited")));
        assert!(result.is_err());
    }
}
