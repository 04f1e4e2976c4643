//! Chan-theory structures as delivered by the structural feed.
//!
//! The engine never builds or mutates these; it only reads the latest
//! snapshot the feed exposes. Candle references are indices into the feed's
//! candle sequence.

use serde::{Deserialize, Serialize};

/// Direction of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// Stroke (bi): a monotonic segment between two structural extrema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub direction: Direction,
    pub high: f64,
    pub low: f64,
    /// Index of the candle the stroke starts on.
    pub start: usize,
    /// Index of the candle the stroke ends on.
    pub end: usize,
}

impl Stroke {
    pub fn new(direction: Direction, low: f64, high: f64, start: usize, end: usize) -> Self {
        Self {
            direction,
            high,
            low,
            start,
            end,
        }
    }

    pub fn is_up(&self) -> bool {
        self.direction == Direction::Up
    }

    pub fn is_down(&self) -> bool {
        self.direction == Direction::Down
    }
}

/// Pivot (zhongshu): the overlap range of at least three strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pivot {
    pub high: f64,
    pub low: f64,
    pub start: usize,
    pub end: usize,
}

impl Pivot {
    pub fn new(low: f64, high: f64, start: usize, end: usize) -> Self {
        Self {
            high,
            low,
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalKind {
    Top,
    Bottom,
}

/// Fractal (fenxing): a three-candle local extremum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fractal {
    pub kind: FractalKind,
    /// Index of the extremum candle.
    pub anchor: usize,
    /// Extremum price (high for a top, low for a bottom).
    pub price: f64,
    /// Index of the candle on which the feed confirmed the fractal.
    pub formed_at: usize,
}

impl Fractal {
    pub fn new(kind: FractalKind, anchor: usize, price: f64, formed_at: usize) -> Self {
        Self {
            kind,
            anchor,
            price,
            formed_at,
        }
    }
}

/// MACD sample aligned one-to-one with candles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSample {
    pub dif: f64,
    pub dea: f64,
    /// MACD histogram (bar) value.
    pub histogram: f64,
}

impl IndicatorSample {
    pub fn new(dif: f64, dea: f64, histogram: f64) -> Self {
        Self {
            dif,
            dea,
            histogram,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.dif.is_finite() && self.dea.is_finite() && self.histogram.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_direction_helpers() {
        let up = Stroke::new(Direction::Up, 95.0, 110.0, 3, 8);
        assert!(up.is_up());
        assert!(!up.is_down());
    }

    #[test]
    fn structure_wire_names_are_snake_case() {
        let fx = Fractal::new(FractalKind::Bottom, 4, 90.0, 5);
        let json = serde_json::to_string(&fx).unwrap();
        assert!(json.contains("\"bottom\""));
        let stroke: Stroke = serde_json::from_str(
            r#"{"direction":"down","high":120.0,"low":90.0,"start":0,"end":6}"#,
        )
        .unwrap();
        assert!(stroke.is_down());
    }
}
