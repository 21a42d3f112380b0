use anyhow::{bail, Context, Result};
use chrono::{Datelike, Duration, NaiveDate};

/// Canonical date-key format used everywhere a day is identified.
/// Days are compared as dates, never as timestamps with time-of-day.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Strict `YYYY-MM-DD` parse. Input that does not round-trip to the exact same
/// string (missing zero padding, trailing characters) is rejected rather than
/// coerced; lenient parsing is how dates drift by a day near midnight.
pub fn parse_date_key(s: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(s, DATE_KEY_FORMAT)
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", s))?;
    if date_key(date) != s {
        bail!("invalid date '{}', expected zero-padded YYYY-MM-DD", s);
    }
    Ok(date)
}

/// Weekday index with Sunday = 0 through Saturday = 6, matching the
/// `disabled_days` convention in the leave policy.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Monday of the week containing `date`. Weeks are Monday-start; this Monday
/// is the key used for the one-leave-per-week rule.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Sunday ending the Monday-start week containing `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Duration::days(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_date_key_formats_padded() {
        assert_eq!(date_key(d(2024, 6, 1)), "2024-06-01");
        assert_eq!(date_key(d(2024, 12, 31)), "2024-12-31");
    }

    #[test]
    fn test_parse_date_key_valid() {
        assert_eq!(parse_date_key("2024-06-10").unwrap(), d(2024, 6, 10));
    }

    #[test]
    fn test_parse_date_key_roundtrips() {
        let key = "2025-01-31";
        assert_eq!(date_key(parse_date_key(key).unwrap()), key);
    }

    #[test]
    fn test_parse_date_key_rejects_garbage() {
        assert!(parse_date_key("not-a-date").is_err());
        assert!(parse_date_key("").is_err());
    }

    #[test]
    fn test_parse_date_key_rejects_unpadded() {
        // chrono would accept these; the strict round-trip check must not.
        assert!(parse_date_key("2024-6-1").is_err());
        assert!(parse_date_key("2024-06-1").is_err());
    }

    #[test]
    fn test_parse_date_key_rejects_impossible_dates() {
        assert!(parse_date_key("2024-02-30").is_err());
        assert!(parse_date_key("2024-13-01").is_err());
    }

    #[test]
    fn test_weekday_index_sunday_zero() {
        // 2024-06-09 is a Sunday, 2024-06-15 a Saturday
        assert_eq!(weekday_index(d(2024, 6, 9)), 0);
        assert_eq!(weekday_index(d(2024, 6, 10)), 1); // Monday
        assert_eq!(weekday_index(d(2024, 6, 15)), 6);
    }

    #[test]
    fn test_week_start_is_monday() {
        // All days of the week 2024-06-10 (Mon) .. 2024-06-16 (Sun) share it
        let monday = d(2024, 6, 10);
        for offset in 0..7 {
            let day = monday + Duration::days(offset);
            assert_eq!(week_start(day), monday, "offset {}", offset);
        }
    }

    #[test]
    fn test_week_start_of_monday_is_itself() {
        assert_eq!(week_start(d(2024, 6, 10)), d(2024, 6, 10));
    }

    #[test]
    fn test_week_end_is_sunday() {
        assert_eq!(week_end(d(2024, 6, 10)), d(2024, 6, 16));
        assert_eq!(week_end(d(2024, 6, 16)), d(2024, 6, 16));
    }

    #[test]
    fn test_week_start_crosses_month_boundary() {
        // 2024-06-01 is a Saturday; its week started Monday 2024-05-27
        assert_eq!(week_start(d(2024, 6, 1)), d(2024, 5, 27));
    }
}
