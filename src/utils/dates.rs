//! Calendar helpers for provider timestamps and date ranges.

use chrono::{NaiveDate, NaiveDateTime, Utc};

/// Format of WeatherAPI's `last_updated` field
pub const PROVIDER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Every day from `start` to `end` inclusive, ascending; empty when `start > end`
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// Date portion of a `YYYY-MM-DD HH:MM` provider timestamp
pub fn date_from_provider_timestamp(raw: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(raw.trim(), PROVIDER_TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.date())
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
