const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

const DAY_NAMES: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

/// "January" for 1 through "December" for 12
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
        .unwrap_or("")
}

/// Schedule day index to name, Sunday = 0
pub fn day_name(day_of_week: i64) -> &'static str {
    usize::try_from(day_of_week)
        .ok()
        .and_then(|index| DAY_NAMES.get(index))
        .copied()
        .unwrap_or("")
}

/// (value, label) pairs for a day-of-week select
pub fn day_options() -> impl Iterator<Item = (i64, &'static str)> {
    DAY_NAMES.iter().enumerate().map(|(i, name)| (i as i64, *name))
}

/// Current (year, month) from the browser clock
pub fn current_year_month() -> (i32, u32) {
    use js_sys::Date;
    let now = Date::new_0();
    // JavaScript months are 0-indexed
    (now.get_full_year() as i32, now.get_month() + 1)
}

/// The current year and the four before it, newest first
pub fn recent_years(current_year: i32) -> Vec<i32> {
    (0..5).map(|offset| current_year - offset).collect()
}

/// "2025-03-07" → "Mar 7, 2025"; anything unparseable is returned as is
pub fn format_display_date(date: &str) -> String {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// Time part of a "YYYY-MM-DD HH:MM:SS" check-in timestamp
pub fn format_check_in_time(timestamp: &str) -> String {
    chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S")
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}
