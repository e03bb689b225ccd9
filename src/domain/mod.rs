// Domain types and value objects
pub mod candle;
pub mod symbol;
pub mod timeframe;

// Re-export commonly used types
pub use candle::{Candle, PriceSeries};
pub use symbol::Symbol;
pub use timeframe::{Timeframe, TimeframeInit, TimeframeSpec, TimeframeValue, resolve_timeframes};
