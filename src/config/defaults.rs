//! Built-in watch list used when no configuration file is given.

use crate::domain::{Symbol, Timeframe, TimeframeInit, TimeframeValue};

pub const DEFAULT_SYMBOLS: &[&str] = &[
    "BTCUSDT", "ETHUSDT", "SOLUSDT", "BNBUSDT", "XRPUSDT", "PAXGUSDT",
];

/// Most important first: the scorer weights by position.
pub const DEFAULT_TIMEFRAMES: &[(Timeframe, f64)] = &[
    (Timeframe::W1, 4.0),
    (Timeframe::D1, 3.0),
    (Timeframe::H4, 2.0),
    (Timeframe::H1, 1.0),
];

pub fn default_symbols() -> Vec<Symbol> {
    DEFAULT_SYMBOLS.iter().map(|s| Symbol::new(*s)).collect()
}

pub fn default_timeframes() -> Vec<TimeframeInit> {
    DEFAULT_TIMEFRAMES
        .iter()
        .map(|(tf, weight)| TimeframeInit {
            value: TimeframeValue::Code(tf.code()),
            weight: *weight,
        })
        .collect()
}
