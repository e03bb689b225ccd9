//! RSI indicator configuration

pub struct RsiConfig {
    /// EMA window (alpha = 1 / window)
    pub default_window: usize,
    /// At or below this an RSI reads as oversold
    pub level_low: f64,
    /// At or above this an RSI reads as overbought
    pub level_high: f64,
    /// How far back each candle query reaches
    pub lookback_days: i64,
    /// Upper bound accepted for `lookback_days`
    pub max_lookback_days: i64,
}

pub const RSI: RsiConfig = RsiConfig {
    default_window: 5,
    level_low: 30.0,
    level_high: 70.0,
    lookback_days: 31,
    max_lookback_days: 36_500,
};
