//! Snapshot file configuration

/// Default path for candle snapshots written by `snapshot_candles`
pub const SNAPSHOT_PATH: &str = "candles_snapshot.json";

/// Current version of the snapshot serialization format
pub const SNAPSHOT_VERSION: f64 = 1.0;
