//! Volatility measures computed by the engine itself.
//!
//! MACD and every chan structure arrive precomputed from the structural feed;
//! ATR is the one series the engine derives, from the feed's candles.

pub mod atr;

pub use atr::{average_true_range, true_range, DEFAULT_ATR_PERIOD};

/// Create synthetic hourly candles from (open, high, low, close) tuples for testing.
#[cfg(test)]
pub fn make_candles(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Candle> {
    use crate::domain::Candle;
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| {
            Candle::new(base + chrono::Duration::hours(i as i64), open, high, low, close)
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
