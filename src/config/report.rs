//! Report table layout and coloring constants

pub struct ScaleBounds {
    pub min: f64,
    pub low: f64,
    pub middle: f64,
    pub high: f64,
    pub max: f64,
}

pub struct ReportConfig {
    pub symbol_header: &'static str,
    pub buy_header: &'static str,
    pub sell_header: &'static str,
    pub bet_header: &'static str,
    /// Decimal places for every numeric cell
    pub float_precision: usize,
    /// Thresholds for the buy/sell cells
    pub recommendation_scale: ScaleBounds,
}

pub const REPORT: ReportConfig = ReportConfig {
    symbol_header: "Symbol",
    buy_header: "BUY",
    sell_header: "SELL",
    bet_header: "BET",
    float_precision: 2,
    recommendation_scale: ScaleBounds {
        min: -1.0,
        low: -1.0,
        middle: 0.0,
        high: 0.5,
        max: 1.0,
    },
};
