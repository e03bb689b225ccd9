//! Relative Strength Index over a close-price series.
//!
//! Gains and losses are smoothed with a recursive (not bias-adjusted) EMA,
//! `alpha = 1 / window`, seeded with the first element. The first candle has no
//! predecessor and contributes a zero move to both legs, so the EMAs start at 0.
//!
//! Degenerate inputs follow IEEE arithmetic instead of raising:
//! - no losses at all: `rs = +inf`, RSI = 100
//! - flat series: `rs = 0/0`, RSI = NaN

use crate::config::RSI;
use crate::domain::PriceSeries;
use crate::errors::{RecommenderError, RecommenderResult};

/// Recursive exponential moving average, `ema[0] = x[0]`.
pub fn ema(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &x in values {
        let next = match prev {
            None => x,
            Some(p) => alpha * x + (1.0 - alpha) * p,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

/// Splits consecutive moves into (gains, losses), both as long as `closes`.
fn gains_and_losses(closes: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let deltas = std::iter::once(0.0).chain(closes.windows(2).map(|w| w[1] - w[0]));
    deltas.map(|d| (d.max(0.0), (-d).max(0.0))).unzip()
}

/// RSI for every candle. Empty for fewer than two closes.
pub fn rsi_series(closes: &[f64], window: usize) -> Vec<f64> {
    if closes.len() < 2 {
        return Vec::new();
    }
    debug_assert!(window > 0, "RSI window must be positive");
    let alpha = 1.0 / window.max(1) as f64;

    let (gains, losses) = gains_and_losses(closes);
    let gain_ema = ema(&gains, alpha);
    let loss_ema = ema(&losses, alpha);

    gain_ema
        .iter()
        .zip(loss_ema.iter())
        .map(|(g, l)| {
            let rs = g / l;
            100.0 - 100.0 / (1.0 + rs)
        })
        .collect()
}

/// Last RSI value of `series`, or `NoData` when there are no consecutive closes.
pub fn compute_rsi(series: &PriceSeries, window: usize) -> RecommenderResult<f64> {
    rsi_series(&series.closes(), window)
        .last()
        .copied()
        .ok_or_else(|| RecommenderError::no_data(&series.symbol, series.timeframe.label()))
}

/// RSI calculator bound to a window.
#[derive(Debug, Clone, Copy)]
pub struct RsiEngine {
    window: usize,
}

impl Default for RsiEngine {
    fn default() -> Self {
        Self {
            window: RSI.default_window,
        }
    }
}

impl RsiEngine {
    pub fn new(window: usize) -> RecommenderResult<Self> {
        if window == 0 {
            return Err(RecommenderError::Configuration(
                "RSI window must be at least 1".to_string(),
            ));
        }
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn reading(&self, series: &PriceSeries) -> RecommenderResult<f64> {
        compute_rsi(series, self.window)
    }
}
