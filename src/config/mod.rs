//! Configuration module for the RSI recommender.

pub mod binance;
pub mod defaults;
pub mod persistence;
pub mod report;
pub mod rsi;
pub mod scan;

// Re-export commonly used items
pub use binance::BINANCE;
pub use persistence::{SNAPSHOT_PATH, SNAPSHOT_VERSION};
pub use report::REPORT;
pub use rsi::RSI;
pub use scan::{ScanFile, ScanSettings};
