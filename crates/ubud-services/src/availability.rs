//! Villa availability engine
//!
//! Pure functions over a snapshot of a villa's reservations:
//! - Decide whether a candidate stay is free
//! - List the reservations a candidate collides with
//! - Build per-day occupancy for a month calendar
//!
//! Stays are half-open `[check_in, check_out)`, so a guest may arrive on the
//! day the previous guest leaves. Cancelled reservations are ignored.

use chrono::NaiveDate;
use ubud_core::{
    dates,
    models::{BookingStatus, DayStatus, Occupancy, Reservation, StayRange},
    AppResult,
};

/// Check if two half-open stays share at least one night
#[inline]
pub fn overlaps(a: &StayRange, b: &StayRange) -> bool {
    a.overlaps(b)
}

/// Active reservations that collide with the candidate stay
///
/// # Errors
///
/// Returns `InvalidRange` when `check_in >= check_out`.
pub fn conflicting_reservations(
    reservations: &[Reservation],
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> AppResult<Vec<Reservation>> {
    let candidate = StayRange::new(check_in, check_out)?;

    Ok(reservations
        .iter()
        .filter(|r| r.is_active())
        .filter(|r| overlaps(&r.stay(), &candidate))
        .copied()
        .collect())
}

/// Decide whether `[check_in, check_out)` is free
///
/// The range is available iff it overlaps no pending or confirmed reservation.
///
/// # Errors
///
/// Returns `InvalidRange` when `check_in >= check_out`; the dates are never
/// swapped.
pub fn is_range_available(
    reservations: &[Reservation],
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> AppResult<bool> {
    let candidate = StayRange::new(check_in, check_out)?;

    Ok(!reservations
        .iter()
        .filter(|r| r.is_active())
        .any(|r| overlaps(&r.stay(), &candidate)))
}

/// Occupancy of a single day; confirmed beats pending
fn occupancy_on(reservations: &[Reservation], day: NaiveDate) -> Occupancy {
    let mut occupancy = Occupancy::Available;

    for reservation in reservations.iter().filter(|r| r.stay().contains(day)) {
        match reservation.status {
            BookingStatus::Confirmed => return Occupancy::Booked,
            BookingStatus::Pending => occupancy = Occupancy::Pending,
            BookingStatus::Cancelled => {}
        }
    }

    occupancy
}

/// Per-day status for every day of `year`-`month`
///
/// `today` is the caller's current calendar day; days strictly before it are
/// flagged `is_past` independently of their occupancy.
///
/// # Errors
///
/// Returns `InvalidDate` when the month is out of range.
pub fn day_status_for_month(
    reservations: &[Reservation],
    year: i32,
    month: u32,
    today: NaiveDate,
) -> AppResult<Vec<DayStatus>> {
    let days = dates::month_days(year, month)?;

    Ok(days
        .into_iter()
        .map(|date| DayStatus {
            date,
            is_past: date < today,
            occupancy: occupancy_on(reservations, date),
        })
        .collect())
}
