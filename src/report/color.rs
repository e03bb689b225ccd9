//! Value-to-color mapping for report cells.
//!
//! `auto_color` is pure: it returns the tint family and a white component
//! (0 = fully saturated, 255 = white). Turning that into terminal escapes is
//! left to the table renderer.

use colorgrad::Color;

use crate::config::{REPORT, RSI};

/// Thresholds a value is colored against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub low: f64,
    pub middle: f64,
    pub high: f64,
    pub max: f64,
}

impl ColorScale {
    /// RSI cells: [0, 100] with configurable low/high, middle halfway between.
    pub fn rsi(low: f64, high: f64) -> Self {
        Self {
            min: 0.0,
            low,
            middle: (low + high) / 2.0,
            high,
            max: 100.0,
        }
    }

    /// Buy/sell cells: [-1, 1], middle 0, high 0.5, low -1.
    pub fn recommendation() -> Self {
        let r = &REPORT.recommendation_scale;
        Self {
            min: r.min,
            low: r.low,
            middle: r.middle,
            high: r.high,
            max: r.max,
        }
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::rsi(RSI.level_low, RSI.level_high)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    /// At or beyond `high`
    Overbought,
    /// At or beyond `low`
    Oversold,
    /// Between `middle` and `high`
    Upper,
    /// Between `low` and `middle`
    Lower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellColor {
    pub tint: Tint,
    pub white: u8,
}

impl CellColor {
    /// Extremes are drawn on a highlighted background.
    pub fn highlighted(&self) -> bool {
        matches!(self.tint, Tint::Overbought | Tint::Oversold)
    }

    pub fn color(&self) -> Color {
        let w = self.white;
        match self.tint {
            Tint::Overbought | Tint::Oversold | Tint::Upper => Color::from_rgba8(w, 255, w, 255),
            Tint::Lower => Color::from_rgba8(255, w, w, 255),
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        let [r, g, b, _] = self.color().to_rgba8();
        [r, g, b]
    }
}

/// `part / span` clamped to [0, 1]; an empty span counts as fully saturated.
fn ratio(part: f64, span: f64) -> f64 {
    if span <= 0.0 {
        return 1.0;
    }
    (part / span).clamp(0.0, 1.0)
}

pub fn auto_color(value: f64, scale: &ColorScale) -> CellColor {
    if value.is_nan() {
        return CellColor {
            tint: Tint::Overbought,
            white: 0,
        };
    }

    if value >= scale.high {
        let r = ratio(value - scale.high, scale.max - scale.high);
        CellColor {
            tint: Tint::Overbought,
            white: 255 - (255.0 * r).ceil() as u8,
        }
    } else if value <= scale.low {
        let r = ratio(scale.low - value, scale.low - scale.min);
        CellColor {
            tint: Tint::Oversold,
            white: 255 - (255.0 * r).ceil() as u8,
        }
    } else if value >= scale.middle {
        let r = ratio(value - scale.middle, scale.high - scale.middle);
        CellColor {
            tint: Tint::Upper,
            white: (255.0 * r).floor() as u8,
        }
    } else {
        let r = ratio(scale.middle - value, scale.middle - scale.low);
        CellColor {
            tint: Tint::Lower,
            white: (255.0 * r).floor() as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn white_at(value: f64, scale: &ColorScale) -> i32 {
        auto_color(value, scale).white as i32
    }

    #[test]
    fn rsi_extremes_are_saturated() {
        let scale = ColorScale::rsi(30.0, 70.0);
        assert_eq!(auto_color(100.0, &scale).white, 0);
        assert_eq!(auto_color(0.0, &scale).white, 0);
        assert_eq!(auto_color(100.0, &scale).tint, Tint::Overbought);
        assert_eq!(auto_color(0.0, &scale).tint, Tint::Oversold);
        assert!(auto_color(0.0, &scale).highlighted());
    }

    #[test]
    fn thresholds_are_white_and_middle_is_saturated() {
        let scale = ColorScale::rsi(30.0, 70.0);
        assert_eq!(auto_color(70.0, &scale).white, 255);
        assert_eq!(auto_color(30.0, &scale).white, 255);
        assert_eq!(auto_color(50.0, &scale).white, 0);
        assert_eq!(auto_color(60.0, &scale).tint, Tint::Upper);
        assert_eq!(auto_color(40.0, &scale).tint, Tint::Lower);
    }

    #[test]
    fn intensity_is_continuous_at_boundaries() {
        let scale = ColorScale::rsi(30.0, 70.0);
        for b in [scale.low, scale.middle, scale.high] {
            let below = white_at(b - EPS, &scale);
            let above = white_at(b + EPS, &scale);
            let at = white_at(b, &scale);
            assert!((below - at).abs() <= 1, "jump below {b}: {below} vs {at}");
            assert!((above - at).abs() <= 1, "jump above {b}: {above} vs {at}");
        }
    }

    #[test]
    fn recommendation_scale_has_no_division_by_zero() {
        // low == min on the recommendation scale
        let scale = ColorScale::recommendation();
        assert_eq!(scale.low, scale.min);
        let c = auto_color(-1.0, &scale);
        assert_eq!(c.tint, Tint::Oversold);
        assert_eq!(c.white, 0);
        assert_eq!(auto_color(0.5, &scale).white, 255);
        assert_eq!(auto_color(1.0, &scale).white, 0);
        assert_eq!(auto_color(0.25, &scale).tint, Tint::Upper);
    }

    #[test]
    fn zero_width_spans_saturate() {
        let scale = ColorScale {
            min: 0.0,
            low: 30.0,
            middle: 50.0,
            high: 100.0,
            max: 100.0,
        };
        assert_eq!(auto_color(100.0, &scale).white, 0);
        let degenerate = ColorScale {
            min: 0.0,
            low: 0.0,
            middle: 0.0,
            high: 0.0,
            max: 0.0,
        };
        assert_eq!(auto_color(0.0, &degenerate).white, 0);
    }

    #[test]
    fn out_of_range_values_clamp() {
        let scale = ColorScale::rsi(30.0, 70.0);
        assert_eq!(auto_color(250.0, &scale).white, 0);
        assert_eq!(auto_color(-50.0, &scale).white, 0);
    }

    #[test]
    fn nan_renders_as_saturated_extreme() {
        let c = auto_color(f64::NAN, &ColorScale::default());
        assert_eq!(c.white, 0);
        assert!(c.highlighted());
    }

    #[test]
    fn tints_map_to_rgb() {
        let hot = CellColor {
            tint: Tint::Overbought,
            white: 10,
        };
        assert_eq!(hot.rgb(), [10, 255, 10]);
        let lower = CellColor {
            tint: Tint::Lower,
            white: 10,
        };
        assert_eq!(lower.rgb(), [255, 10, 10]);
    }
}
