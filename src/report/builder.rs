//! Multi-symbol, multi-timeframe RSI report.
//!
//! One row per symbol, in configured order. A (symbol, timeframe) query that
//! fails or yields too few candles becomes a blank cell and, unless warnings
//! are suppressed, a `log::warn!` line; it never aborts the report.

use chrono::Duration;
use rayon::prelude::*;

use crate::analysis::{
    BetSizer, DecayWeightedScorer, ProportionalBet, RecommendationScore, RsiEngine, Scorer,
};
use crate::config::{REPORT, ScanSettings};
use crate::data::MarketDataSource;
use crate::domain::{Symbol, TimeframeSpec};
use crate::errors::{RecommenderError, RecommenderResult};
use crate::report::color::{CellColor, ColorScale, auto_color};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Center,
    Right,
}

/// Pre-formatted cell text plus its structured color.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub color: Option<CellColor>,
}

impl Cell {
    pub fn blank() -> Self {
        Self::plain("")
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Cell {
            text: text.into(),
            color: None,
        }
    }

    pub fn colored(value: f64, scale: &ColorScale) -> Self {
        Cell {
            text: format_value(value),
            color: Some(auto_color(value, scale)),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    format!("{:.*}", REPORT.float_precision, value)
}

/// Warning text for a blank cell. Too few candles reads as plain NO DATA;
/// any other failure keeps its cause so a network or rate-limit problem is
/// not mistaken for a missing market.
pub fn describe_failure(symbol: &Symbol, spec: &TimeframeSpec, err: &anyhow::Error) -> String {
    match err.downcast_ref::<RecommenderError>() {
        Some(no_data @ RecommenderError::NoData { .. }) => no_data.to_string(),
        _ => format!(
            "{}: {:#}",
            RecommenderError::no_data(symbol.name(), spec.label()),
            err
        ),
    }
}

/// Raw results for one symbol, one slot per configured timeframe.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolReadings {
    pub symbol: Symbol,
    pub rsi: Vec<Option<f64>>,
    pub score: Option<RecommendationScore>,
}

impl SymbolReadings {
    /// Readings that were actually produced, in configured order.
    pub fn present(&self) -> Vec<f64> {
        self.rsi.iter().flatten().copied().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Timeframes that got a column, in configured order
    pub columns: Vec<TimeframeSpec>,
    pub readings: Vec<SymbolReadings>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub aligns: Vec<Align>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct ReportBuilder {
    engine: RsiEngine,
    scorer: Box<dyn Scorer>,
    bet_sizer: Box<dyn BetSizer>,
    rsi_scale: ColorScale,
    recommendation_scale: ColorScale,
    lookback: Duration,
    balance: Option<f64>,
    ignore_warnings: bool,
    hide_empty_timeframes: bool,
    parallel: bool,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(RsiEngine::default())
    }
}

impl ReportBuilder {
    pub fn new(engine: RsiEngine) -> Self {
        Self {
            engine,
            scorer: Box::new(DecayWeightedScorer),
            bet_sizer: Box::new(ProportionalBet),
            rsi_scale: ColorScale::default(),
            recommendation_scale: ColorScale::recommendation(),
            lookback: Duration::days(crate::config::RSI.lookback_days),
            balance: None,
            ignore_warnings: false,
            hide_empty_timeframes: false,
            parallel: false,
        }
    }

    pub fn from_settings(settings: &ScanSettings) -> RecommenderResult<Self> {
        settings.validate()?;
        let mut builder = Self::new(RsiEngine::new(settings.rsi_window)?)
            .with_rsi_levels(settings.level_low, settings.level_high)
            .with_lookback(Duration::days(settings.lookback_days))
            .ignore_warnings(settings.ignore_warnings)
            .hide_empty_timeframes(settings.hide_empty_timeframes)
            .parallel(settings.parallel);
        builder.balance = settings.balance;
        Ok(builder)
    }

    pub fn with_scorer(mut self, scorer: impl Scorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    pub fn with_bet_sizer(mut self, bet_sizer: impl BetSizer + 'static) -> Self {
        self.bet_sizer = Box::new(bet_sizer);
        self
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = Some(balance);
        self
    }

    pub fn with_rsi_levels(mut self, low: f64, high: f64) -> Self {
        self.rsi_scale = ColorScale::rsi(low, high);
        self
    }

    pub fn with_lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn ignore_warnings(mut self, ignore: bool) -> Self {
        self.ignore_warnings = ignore;
        self
    }

    pub fn hide_empty_timeframes(mut self, hide: bool) -> Self {
        self.hide_empty_timeframes = hide;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn reading(
        &self,
        source: &dyn MarketDataSource,
        symbol: &Symbol,
        spec: &TimeframeSpec,
    ) -> anyhow::Result<f64> {
        let end = source.as_of();
        let start = end.checked_sub_signed(self.lookback).ok_or_else(|| {
            RecommenderError::Configuration(format!(
                "lookback of {} days reaches before the earliest representable time",
                self.lookback.num_days()
            ))
        })?;
        let series = source.fetch_candles(symbol.name(), spec.timeframe, start, end)?;
        Ok(self.engine.reading(&series)?)
    }

    fn evaluate_symbol(
        &self,
        source: &dyn MarketDataSource,
        symbol: &Symbol,
        timeframes: &[TimeframeSpec],
    ) -> SymbolReadings {
        let rsi: Vec<Option<f64>> = timeframes
            .iter()
            .map(|spec| match self.reading(source, symbol, spec) {
                Ok(value) => Some(value),
                Err(e) => {
                    if !self.ignore_warnings {
                        log::warn!("{}", describe_failure(symbol, spec, &e));
                    }
                    None
                }
            })
            .collect();

        let mut readings = SymbolReadings {
            symbol: symbol.clone(),
            rsi,
            score: None,
        };
        readings.score = self.scorer.score(&readings.present());
        readings
    }

    /// Collects readings for every symbol. Order follows `symbols` even when
    /// evaluated in parallel.
    pub fn collect_readings(
        &self,
        source: &dyn MarketDataSource,
        symbols: &[Symbol],
        timeframes: &[TimeframeSpec],
    ) -> Vec<SymbolReadings> {
        if self.parallel {
            symbols
                .par_iter()
                .map(|symbol| self.evaluate_symbol(source, symbol, timeframes))
                .collect()
        } else {
            symbols
                .iter()
                .map(|symbol| self.evaluate_symbol(source, symbol, timeframes))
                .collect()
        }
    }

    pub fn build(
        &self,
        source: &dyn MarketDataSource,
        symbols: &[Symbol],
        timeframes: &[TimeframeSpec],
    ) -> Report {
        log::info!(
            "Scanning {} symbol(s) x {} timeframe(s) via {}",
            symbols.len(),
            timeframes.len(),
            source.signature()
        );
        let readings = self.collect_readings(source, symbols, timeframes);
        self.assemble(timeframes, readings)
    }

    /// Lays readings out as header + rows.
    pub fn assemble(&self, timeframes: &[TimeframeSpec], readings: Vec<SymbolReadings>) -> Report {
        let kept: Vec<usize> = (0..timeframes.len())
            .filter(|&j| !self.hide_empty_timeframes || readings.iter().any(|r| r.rsi[j].is_some()))
            .collect();
        let columns: Vec<TimeframeSpec> = kept.iter().map(|&j| timeframes[j]).collect();

        let mut headers = vec![REPORT.symbol_header.to_string()];
        headers.extend(columns.iter().map(|c| c.label().to_string()));
        headers.push(String::new());
        headers.push(REPORT.buy_header.to_string());
        headers.push(REPORT.sell_header.to_string());
        if self.balance.is_some() {
            headers.push(REPORT.bet_header.to_string());
        }

        let rows = readings.iter().map(|r| self.row(r, &kept)).collect();

        let mut aligns = vec![Align::Center];
        aligns.resize(headers.len(), Align::Right);

        Report {
            columns,
            readings,
            headers,
            rows,
            aligns,
        }
    }

    fn row(&self, readings: &SymbolReadings, kept: &[usize]) -> Vec<Cell> {
        let mut cells = vec![Cell::plain(readings.symbol.display_name())];
        cells.extend(kept.iter().map(|&j| match readings.rsi[j] {
            Some(value) => Cell::colored(value, &self.rsi_scale),
            None => Cell::blank(),
        }));
        cells.push(Cell::blank());

        match readings.score {
            Some(score) => {
                cells.push(Cell::colored(score.buy, &self.recommendation_scale));
                cells.push(Cell::colored(score.sell, &self.recommendation_scale));
            }
            None => {
                cells.push(Cell::blank());
                cells.push(Cell::blank());
            }
        }

        if let Some(balance) = self.balance {
            cells.push(match readings.score {
                Some(score) => Cell::plain(format_value(self.bet_sizer.bet_value(
                    &readings.symbol,
                    balance,
                    score.buy,
                ))),
                None => Cell::blank(),
            });
        }
        cells
    }
}
