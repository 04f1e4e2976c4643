//! Timeframes and their provider bar-interval strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bar timeframe, ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timeframe {
    Min5,
    Min15,
    Min30,
    Hour1,
    Day,
    Week,
    Month,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown timeframe '{0}' (expected one of 5m, 15m, 30m, 1h, 1d, 1w, 1M)")]
pub struct TimeframeError(pub String);

impl Timeframe {
    pub const ALL: [Timeframe; 7] = [
        Self::Min5,
        Self::Min15,
        Self::Min30,
        Self::Hour1,
        Self::Day,
        Self::Week,
        Self::Month,
    ];

    /// Provider bar-interval string.
    pub fn interval(self) -> &'static str {
        match self {
            Self::Min5 => "5m",
            Self::Min15 => "15m",
            Self::Min30 => "30m",
            Self::Hour1 => "1h",
            Self::Day => "1d",
            Self::Week => "1w",
            Self::Month => "1M",
        }
    }

    /// Intraday timeframes carry a wall-clock time on each bar.
    pub fn is_intraday(self) -> bool {
        self < Self::Day
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.interval())
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "1M" (month) and "1m" differ only by case, so matching stays case-sensitive.
        let tf = match s.trim() {
            "5m" => Self::Min5,
            "15m" => Self::Min15,
            "30m" => Self::Min30,
            "1h" | "60m" => Self::Hour1,
            "1d" => Self::Day,
            "1w" => Self::Week,
            "1M" => Self::Month,
            other => return Err(TimeframeError(other.to_string())),
        };
        Ok(tf)
    }
}

impl TryFrom<String> for Timeframe {
    type Error = TimeframeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.interval().to_string()
    }
}
