//! Multi-timeframe RSI readings reduced to a buy/sell pair.
//!
//! Reading `i` (0-based, in configured timeframe order, counting only the
//! timeframes that produced a reading) is weighted `3 / (i + 5)`. The decay is
//! positional: it does not look at the timeframe's duration, so configuration
//! must list the most important timeframe first.

use serde::Serialize;

/// `buy + sell == 1`, both derived from the weighted RSI average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecommendationScore {
    pub buy: f64,
    pub sell: f64,
}

impl RecommendationScore {
    pub fn from_sell(sell: f64) -> Self {
        Self {
            buy: 1.0 - sell,
            sell,
        }
    }
}

/// Pluggable reduction from ordered RSI readings to a score.
/// `None` means no score is computable (nothing usable to weigh).
pub trait Scorer: Send + Sync {
    fn score(&self, readings: &[f64]) -> Option<RecommendationScore>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DecayWeightedScorer;

impl DecayWeightedScorer {
    pub fn weight(position: usize) -> f64 {
        3.0 / (position as f64 + 5.0)
    }
}

impl Scorer for DecayWeightedScorer {
    fn score(&self, readings: &[f64]) -> Option<RecommendationScore> {
        aggregate(readings)
    }
}

/// Decay-weighted average of `readings` mapped to a buy/sell pair.
///
/// Non-finite readings (flat series) keep their position but carry no weight.
pub fn aggregate(readings: &[f64]) -> Option<RecommendationScore> {
    let (weighted_sum, weight_total) = readings
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_finite())
        .fold((0.0, 0.0), |(sum, total), (i, &r)| {
            let w = DecayWeightedScorer::weight(i);
            (sum + w * r, total + w)
        });

    if weight_total <= 0.0 {
        return None;
    }
    let sell = weighted_sum / weight_total / 100.0;
    Some(RecommendationScore::from_sell(sell))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn weights_decay_by_position() {
        assert!(approx_eq(DecayWeightedScorer::weight(0), 3.0 / 5.0));
        assert!(approx_eq(DecayWeightedScorer::weight(1), 3.0 / 6.0));
        assert!(approx_eq(DecayWeightedScorer::weight(2), 3.0 / 7.0));
    }

    #[test]
    fn single_reading_maps_straight_to_sell() {
        let score = aggregate(&[80.0]).unwrap();
        assert!(approx_eq(score.sell, 0.8));
        assert!(approx_eq(score.buy, 0.2));
    }

    #[test]
    fn earlier_timeframes_dominate() {
        // (0.6*90 + 0.5*10) / 1.1 = 53.63..
        let score = aggregate(&[90.0, 10.0]).unwrap();
        assert!((score.sell - 59.0 / 110.0).abs() < 1e-12);
        let swapped = aggregate(&[10.0, 90.0]).unwrap();
        assert!(score.sell > swapped.sell);
    }

    #[test]
    fn empty_readings_have_no_score() {
        assert_eq!(aggregate(&[]), None);
        assert_eq!(DecayWeightedScorer.score(&[]), None);
    }

    #[test]
    fn nan_readings_are_skipped_but_keep_their_slot() {
        let score = aggregate(&[f64::NAN, 40.0]).unwrap();
        assert!(approx_eq(score.sell, 0.4));
        assert_eq!(aggregate(&[f64::NAN, f64::NAN]), None);
    }
}
