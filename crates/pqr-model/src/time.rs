//! Clocks and Colombian civil dates.
//!
//! Dates shown to operators (filing, closure, assignment) are civil dates in
//! Bogotá, which has no daylight saving time, so a fixed UTC-05:00 offset is
//! exact. Timestamps (work start, log entries) are kept in UTC.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

/// Date format used for every persisted civil date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const BOGOTA_OFFSET_HOURS: i64 = 5;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Today's civil date in Colombia.
    fn today(&self) -> NaiveDate {
        colombian_date(self.now())
    }
}

/// The operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Converts an instant to the Colombian civil date.
pub fn colombian_date(instant: DateTime<Utc>) -> NaiveDate {
    (instant - TimeDelta::hours(BOGOTA_OFFSET_HOURS)).date_naive()
}

/// Formats a civil date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses the leading `YYYY-MM-DD` of a persisted date, ignoring any time part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let head = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_colombian_date_crosses_midnight() {
        // 03:00 UTC is still the previous evening in Bogotá.
        let instant = Utc.with_ymd_and_hms(2024, 6, 2, 3, 0, 0).unwrap();
        assert_eq!(format_date(colombian_date(instant)), "2024-06-01");
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap());
        assert_eq!(format_date(clock.today()), "2024-06-02");
    }

    #[test]
    fn test_parse_date_ignores_time() {
        assert_eq!(
            parse_date("2024-06-02T10:00:00"),
            NaiveDate::from_ymd_opt(2024, 6, 2)
        );
        assert_eq!(parse_date("02/06/2024"), None);
    }
}
