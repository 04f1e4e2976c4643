//! Candle: the raw market data unit carried by a structural feed.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::bar_time;

/// OHLC(V) candle for a single timeframe step.
///
/// Candles are append-only: once a feed has produced one, it never changes.
/// `time` accepts every provider time format understood by
/// [`bar_time::parse_bar_time`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(with = "bar_time::serde_format")]
    pub time: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Candle {
    pub fn new(time: NaiveDateTime, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    /// Returns true if any OHLC field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }

    /// Basic OHLC sanity check: high >= low, high >= open/close, low <= open/close,
    /// positive prices.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.low > 0.0
            && self.volume.map_or(true, |v| v.is_finite() && v >= 0.0)
    }

    /// True range against the previous candle's close.
    ///
    /// Without a previous close this degrades to `high - low`.
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        let high_low = self.high - self.low;
        match prev_close {
            Some(pc) => high_low
                .max((self.high - pc).abs())
                .max((self.low - pc).abs()),
            None => high_low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_candle() -> Candle {
        let time = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Candle::new(time, 100.0, 105.0, 98.0, 103.0)
    }

    #[test]
    fn candle_is_sane() {
        assert!(sample_candle().is_sane());
    }

    #[test]
    fn candle_detects_void() {
        let mut candle = sample_candle();
        candle.close = f64::NAN;
        assert!(candle.is_void());
        assert!(!candle.is_sane());
    }

    #[test]
    fn candle_detects_inverted_range() {
        let mut candle = sample_candle();
        candle.high = 97.0;
        assert!(!candle.is_sane());
    }

    #[test]
    fn true_range_uses_gap_from_previous_close() {
        let candle = sample_candle();
        assert_eq!(candle.true_range(None), 7.0);
        // Gap down from 112: |98 - 112| = 14 dominates high - low = 7
        assert_eq!(candle.true_range(Some(112.0)), 14.0);
    }

    #[test]
    fn candle_accepts_provider_time_formats() {
        let json = r#"{"time":"20240102093000000","open":1.0,"high":2.0,"low":0.5,"close":1.5}"#;
        let candle: Candle = serde_json::from_str(json).unwrap();
        assert_eq!(candle.time.to_string(), "2024-01-02 09:30:00");
        assert_eq!(candle.volume, None);
    }
}
