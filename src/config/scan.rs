//! Scan configuration: optional JSON file, CLI overrides, built-in defaults.
//!
//! Precedence is CLI flag > file value > built-in constant. Everything is
//! validated here, before any market data is requested.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Cli;
use crate::config::RSI;
use crate::config::defaults::{DEFAULT_TIMEFRAMES, default_symbols, default_timeframes};
use crate::domain::{Symbol, TimeframeInit, TimeframeSpec, resolve_timeframes};
use crate::errors::{RecommenderError, RecommenderResult};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RsiSection {
    pub window: Option<usize>,
    pub level_low: Option<f64>,
    pub level_high: Option<f64>,
    pub lookback_days: Option<i64>,
}

/// On-disk scan configuration. Every section is optional.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScanFile {
    pub symbols: Option<Vec<Symbol>>,
    pub timeframes: Option<Vec<TimeframeInit>>,
    pub rsi: RsiSection,
    pub ignore_warnings: bool,
}

impl ScanFile {
    pub fn from_json(text: &str) -> RecommenderResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| RecommenderError::Configuration(format!("invalid scan config: {e}")))
    }

    pub fn load(path: &Path) -> RecommenderResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            RecommenderError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&text)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettings {
    pub symbols: Vec<Symbol>,
    pub timeframes: Vec<TimeframeSpec>,
    pub rsi_window: usize,
    pub level_low: f64,
    pub level_high: f64,
    pub lookback_days: i64,
    pub ignore_warnings: bool,
    pub hide_empty_timeframes: bool,
    pub parallel: bool,
    pub balance: Option<f64>,
    pub color: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            timeframes: DEFAULT_TIMEFRAMES
                .iter()
                .map(|(tf, weight)| TimeframeSpec::new(*tf, *weight))
                .collect(),
            rsi_window: RSI.default_window,
            level_low: RSI.level_low,
            level_high: RSI.level_high,
            lookback_days: RSI.lookback_days,
            ignore_warnings: false,
            hide_empty_timeframes: false,
            parallel: false,
            balance: None,
            color: true,
        }
    }
}

impl ScanSettings {
    pub fn resolve(file: ScanFile, cli: &Cli) -> RecommenderResult<Self> {
        let timeframe_inits = file.timeframes.unwrap_or_else(default_timeframes);
        let settings = ScanSettings {
            symbols: file.symbols.unwrap_or_else(default_symbols),
            timeframes: resolve_timeframes(&timeframe_inits)?,
            rsi_window: cli
                .rsi_window
                .or(file.rsi.window)
                .unwrap_or(RSI.default_window),
            level_low: cli.rsi_low.or(file.rsi.level_low).unwrap_or(RSI.level_low),
            level_high: cli
                .rsi_high
                .or(file.rsi.level_high)
                .unwrap_or(RSI.level_high),
            lookback_days: cli
                .lookback_days
                .or(file.rsi.lookback_days)
                .unwrap_or(RSI.lookback_days),
            ignore_warnings: cli.ignore_warnings || file.ignore_warnings,
            hide_empty_timeframes: cli.hide_empty_timeframes,
            parallel: cli.parallel,
            balance: cli.balance,
            color: !cli.no_color,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> RecommenderResult<()> {
        if self.rsi_window == 0 {
            return Err(RecommenderError::Configuration(
                "RSI window must be at least 1".to_string(),
            ));
        }
        if !(self.level_low < self.level_high) {
            return Err(RecommenderError::Configuration(format!(
                "RSI low level ({}) must be below high level ({})",
                self.level_low, self.level_high
            )));
        }
        if !(0.0..=100.0).contains(&self.level_low) || !(0.0..=100.0).contains(&self.level_high) {
            return Err(RecommenderError::Configuration(
                "RSI levels must lie within [0, 100]".to_string(),
            ));
        }
        if !(1..=RSI.max_lookback_days).contains(&self.lookback_days) {
            return Err(RecommenderError::Configuration(format!(
                "lookback must be between 1 and {} days, got {}",
                RSI.max_lookback_days, self.lookback_days
            )));
        }
        if let Some(balance) = self.balance {
            if !balance.is_finite() || balance < 0.0 {
                return Err(RecommenderError::Configuration(format!(
                    "balance must be a non-negative number, got {balance}"
                )));
            }
        }
        Ok(())
    }
}
