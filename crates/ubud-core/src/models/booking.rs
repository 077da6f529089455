//! Booking and reservation models
//!
//! A booking is the full admin record; a reservation is the slice of it the
//! availability engine needs (stay dates and status).

use crate::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting confirmation from the admin team
    #[default]
    Pending,
    /// Confirmed stay
    Confirmed,
    /// Cancelled, never blocks the calendar
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl BookingStatus {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Check if a booking in this status occupies the calendar
    pub fn occupies_calendar(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// Half-open stay interval `[start, end)`
///
/// The end date is the check-out day, which the next guest may check in on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl StayRange {
    /// Create a range, rejecting `start >= end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::InvalidRange(format!(
                "check-in {} must be before check-out {}",
                start, end
            )));
        }

        Ok(Self { start, end })
    }

    /// Number of nights covered
    #[inline]
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Check if a day falls inside the range
    #[inline]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day < self.end
    }

    /// Check if two ranges share at least one night
    #[inline]
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for StayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Existing stay on a villa's calendar, as read from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Inclusive start
    pub check_in: NaiveDate,
    /// Exclusive end
    pub check_out: NaiveDate,
    pub status: BookingStatus,
}

impl Reservation {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate, status: BookingStatus) -> Self {
        Self {
            check_in,
            check_out,
            status,
        }
    }

    /// Stay interval of this reservation
    ///
    /// Not validated: malformed rows are rejected before they reach the store.
    #[inline]
    pub fn stay(&self) -> StayRange {
        StayRange {
            start: self.check_in,
            end: self.check_out,
        }
    }

    /// Check if this reservation blocks the calendar
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.occupies_calendar()
    }
}

/// Booking entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier (UUID)
    pub id: Uuid,

    /// Booked villa
    pub villa_id: Uuid,

    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,

    /// Arrival day
    pub check_in: NaiveDate,

    /// Departure day
    pub check_out: NaiveDate,

    pub total_guests: i32,

    /// Price charged for the stay, after any promo
    pub total_price: Decimal,

    /// Current status
    pub status: BookingStatus,

    pub special_requests: Option<String>,

    /// Promo code applied at booking time, uppercased
    pub promo_code: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Calendar view of this booking
    pub fn reservation(&self) -> Reservation {
        Reservation::new(self.check_in, self.check_out, self.status)
    }

    /// Number of nights booked
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Short reference shown to guests and in the admin list
    pub fn reference(&self) -> String {
        let id = self.id.simple().to_string();
        format!("#{}", id[..8].to_uppercase())
    }
}

impl Default for Booking {
    fn default() -> Self {
        let now = Utc::now();
        let today = now.date_naive();
        Self {
            id: Uuid::new_v4(),
            villa_id: Uuid::nil(),
            guest_name: String::new(),
            guest_email: String::new(),
            guest_phone: None,
            check_in: today,
            check_out: today + chrono::Duration::days(1),
            total_guests: 1,
            total_price: Decimal::ZERO,
            status: BookingStatus::Pending,
            special_requests: None,
            promo_code: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Result of an atomic `pending -> confirmed` attempt in the store
///
/// Nothing is written unless the outcome is `Confirmed`.
#[derive(Debug, Clone)]
pub enum ConfirmOutcome {
    /// Booking confirmed, and the promo (if one was given) redeemed
    Confirmed(Booking),
    /// The booking was no longer pending
    NotPending,
    /// Another confirmed stay overlaps this one
    Overlapping,
    /// The promo had no redemptions left
    PromoExhausted,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_booking_status_parse() {
        assert_eq!(BookingStatus::from_str("Confirmed"), Some(BookingStatus::Confirmed));
        assert_eq!(BookingStatus::from_str("pending"), Some(BookingStatus::Pending));
        assert_eq!(BookingStatus::from_str("refunded"), None);
        assert_eq!(BookingStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_booking_status_occupancy() {
        assert!(BookingStatus::Pending.occupies_calendar());
        assert!(BookingStatus::Confirmed.occupies_calendar());
        assert!(!BookingStatus::Cancelled.occupies_calendar());
    }

    #[test]
    fn test_stay_range_rejects_empty_and_reversed() {
        let d = date(2024, 6, 1);
        assert!(matches!(StayRange::new(d, d), Err(AppError::InvalidRange(_))));
        assert!(matches!(
            StayRange::new(date(2024, 6, 5), d),
            Err(AppError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_stay_range_half_open() {
        let stay = StayRange::new(date(2024, 6, 1), date(2024, 6, 4)).unwrap();
        assert_eq!(stay.nights(), 3);
        assert!(stay.contains(date(2024, 6, 1)));
        assert!(stay.contains(date(2024, 6, 3)));
        assert!(!stay.contains(date(2024, 6, 4)));
        assert!(!stay.contains(date(2024, 5, 31)));
    }

    #[test]
    fn test_stay_range_turnover_day_does_not_overlap() {
        let first = StayRange::new(date(2024, 6, 1), date(2024, 6, 4)).unwrap();
        let second = StayRange::new(date(2024, 6, 4), date(2024, 6, 6)).unwrap();
        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn test_booking_reference_and_nights() {
        let booking = Booking {
            id: Uuid::parse_str("a1b2c3d4-0000-4000-8000-000000000000").unwrap(),
            check_in: date(2024, 6, 1),
            check_out: date(2024, 6, 4),
            ..Default::default()
        };

        assert_eq!(booking.reference(), "#A1B2C3D4");
        assert_eq!(booking.nights(), 3);
        assert_eq!(booking.reservation().stay().nights(), 3);
    }
}
