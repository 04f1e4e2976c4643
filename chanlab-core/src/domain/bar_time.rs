//! Bar timestamps as exchanged at the market-data boundary.
//!
//! Providers hand out bar times in three textual shapes:
//! - `YYYY-MM-DD` (daily and coarser bars, midnight implied)
//! - `YYYY-MM-DD HH:MM:SS` (intraday bars; `T` separator also accepted)
//! - `YYYYMMDDHHMMSSmmm` (compact intraday form with milliseconds)

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Canonical output format for bar times.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised bar time '{0}'")]
pub struct BarTimeError(pub String);

/// Parse a provider bar time into a `NaiveDateTime`.
pub fn parse_bar_time(input: &str) -> Result<NaiveDateTime, BarTimeError> {
    let raw = input.trim();
    let err = || BarTimeError(raw.to_string());

    match raw.len() {
        10 => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(err),
        17 if raw.bytes().all(|b| b.is_ascii_digit()) => {
            // Milliseconds are below bar resolution and dropped.
            NaiveDateTime::parse_from_str(&raw[..14], "%Y%m%d%H%M%S").map_err(|_| err())
        }
        19 => NaiveDateTime::parse_from_str(raw, DISPLAY_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
            .map_err(|_| err()),
        _ => Err(err()),
    }
}

/// Serde adapter: writes [`DISPLAY_FORMAT`], reads any format [`parse_bar_time`] accepts.
pub mod serde_format {
    use super::{parse_bar_time, DISPLAY_FORMAT};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&time.format(DISPLAY_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_bar_time(&raw).map_err(serde::de::Error::custom)
    }
}
