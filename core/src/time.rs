use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::model::task::Recurrence;

/// Compute the next occurrence of a recurring task's due date.
///
/// Daily advances one day, weekly seven. Monthly lands on the same
/// day-of-month in the next month, clamped to that month's last valid day
/// (Jan 31 -> Feb 28, or Feb 29 in a leap year). Returns `None` when the
/// date arithmetic cannot produce a valid date.
pub fn next_occurrence(current: NaiveDateTime, recurrence: Recurrence) -> Option<NaiveDateTime> {
    match recurrence {
        Recurrence::Daily => current.checked_add_signed(Duration::days(1)),
        Recurrence::Weekly => current.checked_add_signed(Duration::weeks(1)),
        Recurrence::Monthly => add_months(current, 1),
    }
}

/// Month addition with year carry and day-of-month clamping.
fn add_months(date: NaiveDateTime, months: u32) -> Option<NaiveDateTime> {
    let month0 = date.month0() + months;
    let year = date.year() + (month0 / 12) as i32;
    let month = month0 % 12 + 1;
    let day = date.day().min(days_in_month(year, month)?);
    Some(NaiveDate::from_ymd_opt(year, month, day)?.and_time(date.time()))
}

/// Last valid day of the given month, via the first of the following month.
fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(first_of_next.pred_opt()?.day())
}

/// Parse a user-supplied due date: `YYYY-MM-DD` (midnight) or a full
/// `YYYY-MM-DDTHH:MM:SS` timestamp.
pub fn parse_date(input: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0)
}
