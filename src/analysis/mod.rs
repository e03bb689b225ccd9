// Indicator maths and scoring
pub mod bet_sizing;
pub mod recommendation;
pub mod rsi;

pub use bet_sizing::{BetSizer, ProportionalBet};
pub use recommendation::{DecayWeightedScorer, RecommendationScore, Scorer, aggregate};
pub use rsi::{RsiEngine, compute_rsi, rsi_series};
