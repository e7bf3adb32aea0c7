//! Local-date helpers for tasks and calendar layout.
//!
//! Due dates are plain `YYYY-MM-DD` strings interpreted in local time.
//! Everything here works on `chrono::NaiveDate` so no UTC conversion can
//! shift a date across a day boundary.

use chrono::{Datelike, Days, Local, Months, NaiveDate};

use crate::error::{Error, Result};

/// Wire/display format for due dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Business hours used by the day view's distribution heuristic (inclusive)
pub const BUSINESS_HOURS: std::ops::RangeInclusive<u32> = 9..=17;

/// Today's date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` string into a local date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| Error::InvalidDate(value.to_string()))
}

/// Whether a due-date string refers to a day strictly before today
pub fn is_past(due_date: &str, today: NaiveDate) -> bool {
    matches!(parse_date(due_date), Ok(date) if date < today)
}

/// Whether a due-date string refers to today
pub fn is_today(due_date: &str, today: NaiveDate) -> bool {
    matches!(parse_date(due_date), Ok(date) if date == today)
}

/// The Sunday on or before the given date
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}

/// The 7 consecutive days of the week containing `date`, Sunday first
pub fn week_days(date: NaiveDate) -> Vec<NaiveDate> {
    let start = week_start(date);
    (0..7).map(|offset| start + Days::new(offset)).collect()
}

/// Move a date by whole calendar months, clamping the day-of-month
/// (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    if months >= 0 {
        date + Months::new(months as u32)
    } else {
        date - Months::new(months.unsigned_abs())
    }
}

/// Precomputed layout data for one calendar month.
///
/// `days` is always a fixed 42-cell grid (6 weeks x 7 days) beginning on the
/// Sunday on or before the 1st, so leading/trailing days from adjacent
/// months are included and every month renders uniformly.
#[derive(Debug, Clone)]
pub struct MonthData {
    pub days: Vec<NaiveDate>,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub days_in_month: u32,
    pub month_name: &'static str,
    pub year: i32,
}

impl MonthData {
    /// Layout data for the month containing `pivot`
    pub fn containing(pivot: NaiveDate) -> Self {
        Self::new(pivot.year(), pivot.month())
    }

    /// Layout data for a specific (year, 1-based month) pair
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default());
        let last_day = add_months(first_day, 1) - Days::new(1);
        let start = week_start(first_day);
        let days = (0..42).map(|offset| start + Days::new(offset)).collect();

        Self {
            days,
            first_day,
            last_day,
            days_in_month: last_day.day(),
            month_name: month_name(first_day.month()),
            year: first_day.year(),
        }
    }
}

/// English month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}

/// 12-hour clock label for an hour of the day ("9 AM", "12 PM", ...)
pub fn hour_label_12(hour: u32) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display} {suffix}")
}

/// 24-hour clock label for an hour of the day ("09:00", "17:00", ...)
pub fn hour_label_24(hour: u32) -> String {
    format!("{hour:02}:00")
}
