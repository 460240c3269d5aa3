use chrono::{Local, NaiveDateTime};

use crate::domain::calendar::{self, TIMESTAMP_FORMAT, TIME_FORMAT};

/// Source of "now" for schedule lookups and check-in defaults
pub trait Clock: Send + Sync {
    /// Current local wall-clock time
    fn now(&self) -> NaiveDateTime;
}

/// Reads the host's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Position in the weekly schedule, as the class queries expect it
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleMoment {
    pub day_of_week: i64,
    pub current_time: String,
}

impl ScheduleMoment {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            day_of_week: calendar::day_of_week(now.date()),
            current_time: now.format(TIME_FORMAT).to_string(),
        }
    }
}

/// Timestamp stored with a check-in
pub fn check_in_timestamp(now: NaiveDateTime) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_schedule_moment_from_wednesday_morning() {
        let now = NaiveDate::from_ymd_opt(2025, 6, 18)
            .unwrap()
            .and_hms_opt(9, 5, 42)
            .unwrap();
        let moment = ScheduleMoment::at(now);
        assert_eq!(moment.day_of_week, 3);
        assert_eq!(moment.current_time, "09:05");
        assert_eq!(check_in_timestamp(now), "2025-06-18 09:05:42");
    }
}
