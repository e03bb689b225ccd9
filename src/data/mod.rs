// Market data sources
pub mod binance;
pub mod snapshot;
pub mod source;

// Re-export commonly used types
pub use binance::BinanceSession;
pub use snapshot::CandleSnapshot;
pub use source::{MarketDataSource, check_supported};
