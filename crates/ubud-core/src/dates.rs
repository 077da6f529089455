//! Calendar-date helpers
//!
//! Stay dates travel as plain calendar dates (`NaiveDate`). Locale-aware
//! formatting belongs to whoever renders them.

use crate::{AppError, AppResult};
use chrono::{DateTime, Months, NaiveDate};

/// Parse an ISO `YYYY-MM-DD` date, or the date part of an RFC 3339 timestamp.
///
/// Fails fast on anything else; a bad value is never coerced to today or epoch.
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    let trimmed = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| AppError::InvalidDate(format!("'{}' is not a valid date", value)))
}

/// Whole nights between check-in and check-out (negative when reversed).
#[inline]
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days()
}

/// First day of the given month
pub fn first_of_month(year: i32, month: u32) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::InvalidDate(format!("{}-{:02} is not a valid month", year, month)))
}

/// Number of days in the given month, leap years included
pub fn days_in_month(year: i32, month: u32) -> AppResult<u32> {
    let first = first_of_month(year, month)?;

    // Only December of the last representable year has no following month.
    Ok(match first.checked_add_months(Months::new(1)) {
        Some(next) => nights_between(first, next) as u32,
        None => 31,
    })
}

/// Every date of the given month, in order
pub fn month_days(year: i32, month: u32) -> AppResult<Vec<NaiveDate>> {
    let first = first_of_month(year, month)?;
    let count = days_in_month(year, month)?;

    Ok(first.iter_days().take(count as usize).collect())
}
