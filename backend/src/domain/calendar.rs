//! Date and time helpers shared by the schedule and reporting code.
//!
//! Dates travel as "YYYY-MM-DD" strings and class times as zero-padded
//! "HH:MM" strings; both sort correctly as text, which the SQL queries rely on.

use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::domain::errors::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// First and last calendar day of the given month
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start_of_month = NaiveDate::from_ymd_opt(year, month, 1)?;

    // Last day of the month is the day before the first of the next month
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let end_of_month = next_month?.pred_opt()?;

    Some((start_of_month, end_of_month))
}

/// Month window for report queries, rejecting impossible year/month pairs
pub fn month_window(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    month_bounds(year, month).ok_or_else(|| {
        ValidationError::Invalid(format!("Invalid year/month: {}/{}", year, month))
    })
}

/// Parse a "YYYY-MM-DD" date named `field` in error messages
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ValidationError::Invalid(format!("{} must be a date in YYYY-MM-DD format", field))
    })
}

/// Validate a zero-padded 24-hour "HH:MM" time, returning it trimmed
pub fn parse_class_time(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    let well_formed = value.len() == 5 && NaiveTime::parse_from_str(value, TIME_FORMAT).is_ok();
    if well_formed {
        Ok(value.to_string())
    } else {
        Err(ValidationError::Invalid(format!(
            "{} must be a 24-hour time in HH:MM format",
            field
        )))
    }
}

/// Day index used by the schedule, Sunday = 0
pub fn day_of_week(date: NaiveDate) -> i64 {
    date.weekday().num_days_from_sunday() as i64
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds_uses_real_last_day() {
        let (start, end) = month_bounds(2025, 2).unwrap();
        assert_eq!(format_date(start), "2025-02-01");
        assert_eq!(format_date(end), "2025-02-28");

        let (_, leap_end) = month_bounds(2024, 2).unwrap();
        assert_eq!(format_date(leap_end), "2024-02-29");

        let (_, april_end) = month_bounds(2025, 4).unwrap();
        assert_eq!(format_date(april_end), "2025-04-30");

        let (_, december_end) = month_bounds(2025, 12).unwrap();
        assert_eq!(format_date(december_end), "2025-12-31");
    }

    #[test]
    fn test_month_window_rejects_bad_month() {
        assert!(month_window(2025, 0).is_err());
        assert!(month_window(2025, 13).is_err());
    }

    #[test]
    fn test_parse_class_time_requires_zero_padding() {
        assert_eq!(parse_class_time("start_time", "09:30").unwrap(), "09:30");
        assert!(parse_class_time("start_time", "9:30").is_err());
        assert!(parse_class_time("start_time", "24:00").is_err());
        assert!(parse_class_time("start_time", "10:00:00").is_err());
    }

    #[test]
    fn test_day_of_week_starts_on_sunday() {
        // 2025-06-15 was a Sunday, 2025-06-18 a Wednesday
        assert_eq!(day_of_week(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()), 0);
        assert_eq!(day_of_week(NaiveDate::from_ymd_opt(2025, 6, 18).unwrap()), 3);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(format_date(parse_date("date", "2025-03-07").unwrap()), "2025-03-07");
        assert!(parse_date("date", "03/07/2025").is_err());
    }
}
