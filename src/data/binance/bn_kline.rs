// Std library crates
use std::convert::TryFrom;
use std::error::Error;
use std::fmt;

// External crates
use binance_sdk::spot::rest_api::{KlinesIntervalEnum, KlinesItemInner};

// Local crates
use crate::domain::{Candle, Timeframe};

/// Binance interval for a terminal timeframe. Binance has no 2/4/6/10/12/20
/// minute or 3 hour bars, so those timeframes are unsupported.
pub fn try_interval_from_timeframe(timeframe: Timeframe) -> Option<KlinesIntervalEnum> {
    match timeframe {
        Timeframe::M1 => Some(KlinesIntervalEnum::Interval1m),
        Timeframe::M3 => Some(KlinesIntervalEnum::Interval3m),
        Timeframe::M5 => Some(KlinesIntervalEnum::Interval5m),
        Timeframe::M15 => Some(KlinesIntervalEnum::Interval15m),
        Timeframe::M30 => Some(KlinesIntervalEnum::Interval30m),
        Timeframe::H1 => Some(KlinesIntervalEnum::Interval1h),
        Timeframe::H2 => Some(KlinesIntervalEnum::Interval2h),
        Timeframe::H4 => Some(KlinesIntervalEnum::Interval4h),
        Timeframe::H6 => Some(KlinesIntervalEnum::Interval6h),
        Timeframe::H8 => Some(KlinesIntervalEnum::Interval8h),
        Timeframe::H12 => Some(KlinesIntervalEnum::Interval12h),
        Timeframe::D1 => Some(KlinesIntervalEnum::Interval1d),
        Timeframe::W1 => Some(KlinesIntervalEnum::Interval1w),
        Timeframe::MN1 => Some(KlinesIntervalEnum::Interval1M),
        Timeframe::M2
        | Timeframe::M4
        | Timeframe::M6
        | Timeframe::M10
        | Timeframe::M12
        | Timeframe::M20
        | Timeframe::H3 => None,
    }
}

/// The two kline fields the RSI needs.
#[derive(Debug, PartialEq)]
pub struct BNKline {
    pub open_timestamp_ms: i64,
    pub close_price: Option<f64>,
}

// Custom error type for BNKline for better error messages.
#[derive(Debug)]
pub enum BNKlineError {
    InvalidLength,
    InvalidType(String),
}

impl fmt::Display for BNKlineError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BNKlineError::InvalidLength => write!(f, "Invalid length"),
            BNKlineError::InvalidType(string) => write!(f, "Invalid type: {}", string),
        }
    }
}

impl Error for BNKlineError {}

// Prices arrive as strings; anything else (or an unparsable string) is None.
fn item_to_float(item: Option<KlinesItemInner>) -> Option<f64> {
    item.and_then(|inner| {
        if let KlinesItemInner::String(s) = inner {
            s.parse::<f64>().ok()
        } else {
            None
        }
    })
}

// Kline layout: [open_time, open, high, low, close, volume, close_time, ...]
impl TryFrom<Vec<KlinesItemInner>> for BNKline {
    type Error = BNKlineError;

    fn try_from(vec_inner_klines: Vec<KlinesItemInner>) -> Result<Self, Self::Error> {
        let mut items = vec_inner_klines.into_iter();
        let open_timestamp_ms = match items.next().ok_or(BNKlineError::InvalidLength)? {
            KlinesItemInner::Integer(a) => a,
            _ => return Err(BNKlineError::InvalidType("open_time".to_string())),
        };
        // skip open, high, low
        let close_price = item_to_float(items.nth(3));

        Ok(BNKline {
            open_timestamp_ms,
            close_price,
        })
    }
}

pub fn convert_klines(data: Vec<Vec<KlinesItemInner>>) -> Result<Vec<BNKline>, BNKlineError> {
    data.into_iter().map(Vec::try_into).collect()
}

/// Drops klines without a parsable close.
pub fn to_candles(klines: Vec<BNKline>) -> Vec<Candle> {
    klines
        .into_iter()
        .filter_map(|k| k.close_price.map(|close| Candle::new(k.open_timestamp_ms, close)))
        .collect()
}
