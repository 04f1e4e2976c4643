//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|), per candle.
//! ATR here is the simple mean of the last `period` true ranges, recomputed
//! from the candle history on demand (the engine needs one value per step,
//! not a precomputed series).

use crate::domain::Candle;

/// Default ATR window used for stop placement and sizing.
pub const DEFAULT_ATR_PERIOD: usize = 14;

/// True Range series.
/// TR[0] = high[0] - low[0] (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(candles: &[Candle]) -> Vec<f64> {
    candles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let prev_close = i.checked_sub(1).map(|p| candles[p].close);
            c.true_range(prev_close)
        })
        .collect()
}

/// Mean true range of the last `period` candles.
///
/// Returns `None` when fewer than `period` candles exist or the result is not
/// finite. The oldest candle in the window uses the close just before the
/// window when one exists.
pub fn average_true_range(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period {
        return None;
    }
    // One extra candle so the window's oldest range sees its previous close.
    let from = (candles.len() - period).saturating_sub(1);
    let ranges = true_range(&candles[from..]);
    let sum: f64 = ranges[ranges.len() - period..].iter().sum();
    let atr = sum / period as f64;
    atr.is_finite().then_some(atr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, DEFAULT_EPSILON};

    #[test]
    fn true_range_basic() {
        let candles = make_candles(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = 105-95 = 10
            (102.0, 108.0, 100.0, 106.0), // TR = max(8, |108-102|, |100-102|) = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range(&candles);
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let candles = make_candles(&[
            (98.0, 102.0, 97.0, 100.0),
            (110.0, 115.0, 108.0, 112.0), // TR = max(7, |115-100|, |108-100|) = 15
        ]);
        assert_approx(true_range(&candles)[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_is_per_candle_not_across_arrays() {
        // Per-candle maxima: 10, 8, 9 → mean 9. Taking the max of three whole
        // arrays instead would yield a different (wrong) figure.
        let candles = make_candles(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0),
            (106.0, 107.0, 98.0, 99.0),
        ]);
        assert_approx(average_true_range(&candles, 3).unwrap(), 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_window_uses_close_before_window() {
        let candles = make_candles(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0), // 8
            (106.0, 107.0, 98.0, 99.0),   // 9
            (99.0, 103.0, 97.0, 101.0),   // 6
        ]);
        assert_approx(average_true_range(&candles, 3).unwrap(), 23.0 / 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_needs_full_window() {
        let candles = make_candles(&[(100.0, 101.0, 99.0, 100.0); 13]);
        assert_eq!(average_true_range(&candles, DEFAULT_ATR_PERIOD), None);
        let candles = make_candles(&[(100.0, 101.0, 99.0, 100.0); 14]);
        assert_approx(
            average_true_range(&candles, DEFAULT_ATR_PERIOD).unwrap(),
            2.0,
            DEFAULT_EPSILON,
        );
    }

    #[test]
    fn zero_period_is_not_computable() {
        let candles = make_candles(&[(100.0, 101.0, 99.0, 100.0)]);
        assert_eq!(average_true_range(&candles, 0), None);
    }
}
