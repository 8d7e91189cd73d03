//! Conversions between fractional hours and chrono timestamps

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Drop seconds and sub-second precision
pub fn truncate_to_minute(t: NaiveDateTime) -> NaiveDateTime {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// Fractional hours as a millisecond-precision duration
pub fn hours_to_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours * MILLIS_PER_HOUR).round() as i64)
}

/// Fractional hours between two timestamps
pub fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Midnight at the start of `date`
pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

/// Hour of day of `t` as a fraction, e.g. 06:30 is 6.5
pub fn hour_of_day(t: NaiveDateTime) -> f64 {
    hours_between(midnight(t.date()), t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 3)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_truncate_to_minute() {
        assert_eq!(truncate_to_minute(at(8, 15, 42)), at(8, 15, 0));
    }

    #[test]
    fn test_fractional_hours_round_trip() {
        let start = at(6, 0, 0);
        let end = start + hours_to_duration(9.090909);
        assert!((hours_between(start, end) - 9.090909).abs() < 1e-6);
    }

    #[test]
    fn test_hour_of_day() {
        assert_eq!(hour_of_day(at(0, 0, 0)), 0.0);
        assert_eq!(hour_of_day(at(6, 30, 0)), 6.5);
    }
}
