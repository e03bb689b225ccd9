//! Error kinds shared by the engine, the report builder and the data sources.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommenderError {
    /// The market-data source could not connect or authenticate. Fatal.
    #[error("market data source initialization failed: {0}")]
    Initialization(String),

    /// A (symbol, timeframe) query produced no usable price series.
    /// Recoverable: the caller blanks that one cell and carries on.
    #[error("[NO DATA] No data found for symbol '{symbol}' in timeframe '{timeframe}'")]
    NoData { symbol: String, timeframe: String },

    /// Bad static configuration (unknown timeframe, invalid RSI settings...). Fatal.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl RecommenderError {
    pub fn no_data(symbol: impl Into<String>, timeframe: impl Into<String>) -> Self {
        RecommenderError::NoData {
            symbol: symbol.into(),
            timeframe: timeframe.into(),
        }
    }

    /// True for the per-cell errors the report builder swallows.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RecommenderError::NoData { .. })
    }
}

pub type RecommenderResult<T> = Result<T, RecommenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_message_names_symbol_and_timeframe() {
        let err = RecommenderError::no_data("EURUSD", "W1");
        assert_eq!(
            err.to_string(),
            "[NO DATA] No data found for symbol 'EURUSD' in timeframe 'W1'"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn fatal_kinds_are_not_recoverable() {
        assert!(!RecommenderError::Initialization("ping failed".into()).is_recoverable());
        assert!(!RecommenderError::Configuration("bad timeframe".into()).is_recoverable());
    }
}
