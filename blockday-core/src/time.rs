//! Time utilities: plain wall-clock and date parsing (no timezones).

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};

/// Parse "HH:MM" or "HH:MM:SS".
pub fn parse_clock(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|e| anyhow::anyhow!("invalid time '{s}': {e}"))
}

/// Parse "YYYY-MM-DD".
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{s}': {e}"))
}

/// "HH:MM" rendering used in event listings.
pub fn format_clock(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}
