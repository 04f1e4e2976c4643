//! Structural feed boundary.
//!
//! A feed is a finite, forward-only sequence of steps. Each `advance()` appends
//! one candle and its indicator sample, and may replace the stroke, pivot and
//! fractal snapshots (the structure layer is allowed to revise its tail as new
//! candles arrive). The engine reads the current state through a [`FeedView`],
//! which borrows the feed and therefore cannot outlive the next `advance()`.
//!
//! Two replay implementations are provided:
//! - [`ReplayFeed`]: in-memory frames (tests, benchmarks, embedding)
//! - [`TapeFeed`]: JSON-lines tape read lazily from any `BufRead`

pub mod replay;
pub mod tape;

pub use replay::ReplayFeed;
pub use tape::TapeFeed;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Candle, Fractal, IndicatorSample, Pivot, Stroke};

/// Upstream data failures. These halt a run; they are never "no signal".
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed '{feed}' is not open")]
    NotOpen { feed: String },

    #[error("malformed frame at line {line}: {reason}")]
    MalformedFrame { line: usize, reason: String },

    #[error("tape truncated at line {line}")]
    Truncated { line: usize },

    #[error("invalid candle at step {step}: {reason}")]
    InvalidCandle { step: usize, reason: String },

    #[error("invalid structure at step {step}: {reason}")]
    InvalidStructure { step: usize, reason: String },

    #[error("feed I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for structural feeds.
///
/// Lifecycle: `open()` → `advance()`* → `close()`. Advancing a feed that is
/// not open is an error. A feed is restartable only by constructing a new one.
pub trait StructuralFeed {
    /// Human-readable name (e.g., "BTC/USDT 1d").
    fn name(&self) -> &str;

    fn open(&mut self) -> Result<(), FeedError>;

    /// Move forward one step. Returns `Ok(false)` once exhausted.
    fn advance(&mut self) -> Result<bool, FeedError>;

    /// Read-only snapshot of the current step.
    fn view(&self) -> FeedView<'_>;

    fn close(&mut self);
}

/// One recorded step of a feed.
///
/// Structure fields left out (or `null`) keep the previous snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TapeFrame {
    pub candle: Candle,
    pub indicator: IndicatorSample,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strokes: Option<Vec<Stroke>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivots: Option<Vec<Pivot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fractals: Option<Vec<Fractal>>,
}

impl TapeFrame {
    pub fn new(candle: Candle, indicator: IndicatorSample) -> Self {
        Self {
            candle,
            indicator,
            strokes: None,
            pivots: None,
            fractals: None,
        }
    }

    pub fn with_strokes(mut self, strokes: Vec<Stroke>) -> Self {
        self.strokes = Some(strokes);
        self
    }

    pub fn with_pivots(mut self, pivots: Vec<Pivot>) -> Self {
        self.pivots = Some(pivots);
        self
    }

    pub fn with_fractals(mut self, fractals: Vec<Fractal>) -> Self {
        self.fractals = Some(fractals);
        self
    }
}

/// Accumulated structural state of a feed.
///
/// Candles and indicator samples are append-only; structure snapshots are
/// replaced wholesale by frames that carry them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureState {
    pub candles: Vec<Candle>,
    pub indicators: Vec<IndicatorSample>,
    pub strokes: Vec<Stroke>,
    pub pivots: Vec<Pivot>,
    pub fractals: Vec<Fractal>,
}

impl StructureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a frame and fold it into the state.
    ///
    /// The state is left untouched when the frame is rejected.
    pub fn apply(&mut self, frame: TapeFrame) -> Result<(), FeedError> {
        let step = self.candles.len();
        let invalid_candle = |reason: String| FeedError::InvalidCandle { step, reason };
        let invalid_structure = |reason: String| FeedError::InvalidStructure { step, reason };

        if !frame.candle.is_sane() {
            return Err(invalid_candle(format!("OHLC out of order: {:?}", frame.candle)));
        }
        if let Some(prev) = self.candles.last() {
            if frame.candle.time <= prev.time {
                return Err(invalid_candle(format!(
                    "time {} does not follow {}",
                    frame.candle.time, prev.time
                )));
            }
        }
        if !frame.indicator.is_finite() {
            return Err(invalid_candle("non-finite indicator sample".into()));
        }
        if let Some(strokes) = &frame.strokes {
            if let Some(bad) = strokes.iter().find(|s| !(s.high >= s.low)) {
                return Err(invalid_structure(format!(
                    "stroke high {} below low {}",
                    bad.high, bad.low
                )));
            }
        }
        if let Some(pivots) = &frame.pivots {
            if let Some(bad) = pivots.iter().find(|p| !(p.high >= p.low)) {
                return Err(invalid_structure(format!(
                    "pivot high {} below low {}",
                    bad.high, bad.low
                )));
            }
        }
        if let Some(fractals) = &frame.fractals {
            if let Some(bad) = fractals.iter().find(|f| f.formed_at > step) {
                return Err(invalid_structure(format!(
                    "fractal formed at candle {} ahead of step {step}",
                    bad.formed_at
                )));
            }
        }

        self.candles.push(frame.candle);
        self.indicators.push(frame.indicator);
        if let Some(strokes) = frame.strokes {
            self.strokes = strokes;
        }
        if let Some(pivots) = frame.pivots {
            self.pivots = pivots;
        }
        if let Some(fractals) = frame.fractals {
            self.fractals = fractals;
        }
        Ok(())
    }

    pub fn view(&self) -> FeedView<'_> {
        FeedView {
            candles: &self.candles,
            indicators: &self.indicators,
            strokes: &self.strokes,
            pivots: &self.pivots,
            fractals: &self.fractals,
        }
    }
}

/// Borrowed, read-only snapshot of a feed's current step.
#[derive(Debug, Clone, Copy)]
pub struct FeedView<'a> {
    candles: &'a [Candle],
    indicators: &'a [IndicatorSample],
    strokes: &'a [Stroke],
    pivots: &'a [Pivot],
    fractals: &'a [Fractal],
}

impl<'a> FeedView<'a> {
    pub fn candles(&self) -> &'a [Candle] {
        self.candles
    }

    pub fn latest_candle(&self) -> Option<&'a Candle> {
        self.candles.last()
    }

    /// Index of the latest candle, the reference frame for `Fractal::formed_at`.
    pub fn latest_index(&self) -> Option<usize> {
        self.candles.len().checked_sub(1)
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.latest_candle().map(|c| c.close)
    }

    pub fn indicators(&self) -> &'a [IndicatorSample] {
        self.indicators
    }

    pub fn latest_indicator(&self) -> Option<&'a IndicatorSample> {
        self.indicators.last()
    }

    pub fn strokes(&self) -> &'a [Stroke] {
        self.strokes
    }

    pub fn pivots(&self) -> &'a [Pivot] {
        self.pivots
    }

    /// The last `n` pivots (fewer if the sequence is shorter).
    pub fn recent_pivots(&self, n: usize) -> &'a [Pivot] {
        &self.pivots[self.pivots.len().saturating_sub(n)..]
    }

    pub fn fractals(&self) -> &'a [Fractal] {
        self.fractals
    }
}
