//! Candle resolutions and their startup resolution from configuration.
//!
//! Timeframes are identified by the integer codes MetaTrader terminals use
//! (minutes for sub-hour bars, flag bits for hours/days/weeks/months). A
//! configuration may name a timeframe either by that code or symbolically
//! (`"W1"`, `"TIMEFRAME_W1"`, `"mt5.TIMEFRAME_W1"`); both are resolved once,
//! through the static table below, before any market data is requested.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::errors::{RecommenderError, RecommenderResult};

const HOUR_FLAG: i64 = 0x4000;
const WEEK_FLAG: i64 = 0x8000;
const MONTH_FLAG: i64 = 0xC000;

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum_macros::EnumIter,
)]
pub enum Timeframe {
    M1,
    M2,
    M3,
    M4,
    M5,
    M6,
    M10,
    M12,
    M15,
    M20,
    M30,
    H1,
    H2,
    H3,
    H4,
    H6,
    H8,
    H12,
    D1,
    W1,
    MN1,
}

impl Timeframe {
    /// Integer code understood by the terminal-style market data APIs.
    pub const fn code(self) -> i64 {
        match self {
            Timeframe::M1 => 1,
            Timeframe::M2 => 2,
            Timeframe::M3 => 3,
            Timeframe::M4 => 4,
            Timeframe::M5 => 5,
            Timeframe::M6 => 6,
            Timeframe::M10 => 10,
            Timeframe::M12 => 12,
            Timeframe::M15 => 15,
            Timeframe::M20 => 20,
            Timeframe::M30 => 30,
            Timeframe::H1 => 1 | HOUR_FLAG,
            Timeframe::H2 => 2 | HOUR_FLAG,
            Timeframe::H3 => 3 | HOUR_FLAG,
            Timeframe::H4 => 4 | HOUR_FLAG,
            Timeframe::H6 => 6 | HOUR_FLAG,
            Timeframe::H8 => 8 | HOUR_FLAG,
            Timeframe::H12 => 12 | HOUR_FLAG,
            Timeframe::D1 => 24 | HOUR_FLAG,
            Timeframe::W1 => 1 | WEEK_FLAG,
            Timeframe::MN1 => 1 | MONTH_FLAG,
        }
    }

    /// Canonical display label, used as the table header.
    pub const fn label(self) -> &'static str {
        match self {
            Timeframe::M1 => "M1",
            Timeframe::M2 => "M2",
            Timeframe::M3 => "M3",
            Timeframe::M4 => "M4",
            Timeframe::M5 => "M5",
            Timeframe::M6 => "M6",
            Timeframe::M10 => "M10",
            Timeframe::M12 => "M12",
            Timeframe::M15 => "M15",
            Timeframe::M20 => "M20",
            Timeframe::M30 => "M30",
            Timeframe::H1 => "H1",
            Timeframe::H2 => "H2",
            Timeframe::H3 => "H3",
            Timeframe::H4 => "H4",
            Timeframe::H6 => "H6",
            Timeframe::H8 => "H8",
            Timeframe::H12 => "H12",
            Timeframe::D1 => "D1",
            Timeframe::W1 => "W1",
            Timeframe::MN1 => "MN1",
        }
    }

    /// Nominal bar length in minutes (months count as 30 days).
    pub const fn minutes(self) -> i64 {
        match self {
            Timeframe::M1 => 1,
            Timeframe::M2 => 2,
            Timeframe::M3 => 3,
            Timeframe::M4 => 4,
            Timeframe::M5 => 5,
            Timeframe::M6 => 6,
            Timeframe::M10 => 10,
            Timeframe::M12 => 12,
            Timeframe::M15 => 15,
            Timeframe::M20 => 20,
            Timeframe::M30 => 30,
            Timeframe::H1 => 60,
            Timeframe::H2 => 2 * 60,
            Timeframe::H3 => 3 * 60,
            Timeframe::H4 => 4 * 60,
            Timeframe::H6 => 6 * 60,
            Timeframe::H8 => 8 * 60,
            Timeframe::H12 => 12 * 60,
            Timeframe::D1 => 24 * 60,
            Timeframe::W1 => 7 * 24 * 60,
            Timeframe::MN1 => 30 * 24 * 60,
        }
    }

    pub fn from_code(code: i64) -> RecommenderResult<Self> {
        Timeframe::iter()
            .find(|tf| tf.code() == code)
            .ok_or_else(|| RecommenderError::Configuration(format!("unknown timeframe code {code}")))
    }

    /// Accepts `W1`, `TIMEFRAME_W1` and dotted forms such as `mt5.TIMEFRAME_W1`.
    pub fn from_name(name: &str) -> RecommenderResult<Self> {
        let last_segment = name.rsplit('.').next().unwrap_or(name).trim();
        let upper = last_segment.to_ascii_uppercase();
        let label = upper.strip_prefix("TIMEFRAME_").unwrap_or(&upper);
        Timeframe::iter()
            .find(|tf| tf.label() == label)
            .ok_or_else(|| {
                RecommenderError::Configuration(format!("unknown timeframe name '{name}'"))
            })
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Raw timeframe value as written in configuration files.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TimeframeValue {
    Code(i64),
    Name(String),
}

/// Timeframe entry before resolution.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeframeInit {
    pub value: TimeframeValue,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// Resolved timeframe entry. `weight` is carried through from configuration
/// but the decay-weighted scorer weights readings by position, not by this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeframeSpec {
    pub timeframe: Timeframe,
    pub weight: f64,
}

impl TimeframeSpec {
    pub fn new(timeframe: Timeframe, weight: f64) -> Self {
        Self { timeframe, weight }
    }

    pub fn code(&self) -> i64 {
        self.timeframe.code()
    }

    pub fn label(&self) -> &'static str {
        self.timeframe.label()
    }
}

impl TryFrom<&TimeframeInit> for TimeframeSpec {
    type Error = RecommenderError;

    fn try_from(init: &TimeframeInit) -> Result<Self, Self::Error> {
        let timeframe = match &init.value {
            TimeframeValue::Code(code) => Timeframe::from_code(*code)?,
            TimeframeValue::Name(name) => Timeframe::from_name(name)?,
        };
        Ok(TimeframeSpec::new(timeframe, init.weight))
    }
}

/// Resolve every configured timeframe, failing on the first unknown entry.
pub fn resolve_timeframes(inits: &[TimeframeInit]) -> RecommenderResult<Vec<TimeframeSpec>> {
    inits.iter().map(TimeframeSpec::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_terminal_constants() {
        assert_eq!(Timeframe::M1.code(), 1);
        assert_eq!(Timeframe::M30.code(), 30);
        assert_eq!(Timeframe::H1.code(), 16385);
        assert_eq!(Timeframe::H4.code(), 16388);
        assert_eq!(Timeframe::D1.code(), 16408);
        assert_eq!(Timeframe::W1.code(), 32769);
        assert_eq!(Timeframe::MN1.code(), 49153);
    }

    #[test]
    fn every_code_round_trips_through_lookup() {
        for tf in Timeframe::iter() {
            assert_eq!(Timeframe::from_code(tf.code()).unwrap(), tf);
            assert_eq!(Timeframe::from_name(tf.label()).unwrap(), tf);
        }
    }

    #[test]
    fn symbolic_names_in_all_accepted_forms() {
        assert_eq!(Timeframe::from_name("W1").unwrap(), Timeframe::W1);
        assert_eq!(Timeframe::from_name("TIMEFRAME_W1").unwrap(), Timeframe::W1);
        assert_eq!(Timeframe::from_name("mt5.TIMEFRAME_W1").unwrap(), Timeframe::W1);
        assert_eq!(Timeframe::from_name("timeframe_h4").unwrap(), Timeframe::H4);
        // M1 and MN1 must not be confused
        assert_eq!(Timeframe::from_name("TIMEFRAME_MN1").unwrap(), Timeframe::MN1);
    }

    #[test]
    fn unknown_timeframes_are_configuration_errors() {
        assert!(matches!(
            Timeframe::from_name("TIMEFRAME_Y1"),
            Err(RecommenderError::Configuration(_))
        ));
        assert!(matches!(
            Timeframe::from_code(7),
            Err(RecommenderError::Configuration(_))
        ));
    }

    #[test]
    fn inits_deserialize_from_codes_and_names() {
        let inits: Vec<TimeframeInit> = serde_json::from_str(
            r#"[{"value": 32769, "weight": 3}, {"value": "mt5.TIMEFRAME_D1", "weight": 2}, {"value": "H4"}]"#,
        )
        .unwrap();
        let specs = resolve_timeframes(&inits).unwrap();
        assert_eq!(
            specs,
            vec![
                TimeframeSpec::new(Timeframe::W1, 3.0),
                TimeframeSpec::new(Timeframe::D1, 2.0),
                TimeframeSpec::new(Timeframe::H4, 1.0),
            ]
        );
    }

    #[test]
    fn resolution_stops_on_first_bad_entry() {
        let inits = vec![
            TimeframeInit {
                value: TimeframeValue::Name("D1".into()),
                weight: 1.0,
            },
            TimeframeInit {
                value: TimeframeValue::Name("TIMEFRAME_BOGUS".into()),
                weight: 1.0,
            },
        ];
        assert!(resolve_timeframes(&inits).is_err());
    }
}
