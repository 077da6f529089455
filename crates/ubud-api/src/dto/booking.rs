//! Booking DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ubud_core::{
    models::{Booking, BookingStatus},
    AppError, AppResult,
};
use ubud_services::BookingConfirmation;
use uuid::Uuid;

/// Filters for the admin booking list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilterParams {
    pub status: Option<String>,
    pub villa_id: Option<Uuid>,
}

impl BookingFilterParams {
    /// Parsed status filter; `all` or empty means no filter
    pub fn status(&self) -> AppResult<Option<BookingStatus>> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(s) => BookingStatus::from_str(s)
                .map(Some)
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown booking status: {}", s))),
        }
    }
}

/// Booking as shown in the admin list
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    /// Short reference such as `#A1B2C3D4`
    pub reference: String,
    pub villa_id: Uuid,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub total_guests: i32,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub special_requests: Option<String>,
    pub promo_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            reference: b.reference(),
            nights: b.nights(),
            id: b.id,
            villa_id: b.villa_id,
            guest_name: b.guest_name,
            guest_email: b.guest_email,
            guest_phone: b.guest_phone,
            check_in: b.check_in,
            check_out: b.check_out,
            total_guests: b.total_guests,
            total_price: b.total_price,
            status: b.status,
            special_requests: b.special_requests,
            promo_code: b.promo_code,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

/// Result of a confirm call
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmBookingResponse {
    pub booking: BookingResponse,
    /// False when the booking was already confirmed
    pub newly_confirmed: bool,
    pub promo_redeemed: bool,
}

impl From<BookingConfirmation> for ConfirmBookingResponse {
    fn from(c: BookingConfirmation) -> Self {
        Self {
            booking: c.booking.into(),
            newly_confirmed: c.newly_confirmed,
            promo_redeemed: c.promo_redeemed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter() {
        let params = |s: Option<&str>| BookingFilterParams {
            status: s.map(String::from),
            villa_id: None,
        };

        assert_eq!(params(None).status().unwrap(), None);
        assert_eq!(params(Some("all")).status().unwrap(), None);
        assert_eq!(
            params(Some("confirmed")).status().unwrap(),
            Some(BookingStatus::Confirmed)
        );
        assert!(matches!(
            params(Some("refunded")).status(),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_booking_response_derived_fields() {
        let booking = Booking {
            check_in: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            ..Default::default()
        };
        let reference = booking.reference();

        let response = BookingResponse::from(booking);
        assert_eq!(response.nights, 4);
        assert_eq!(response.reference, reference);
        assert!(response.reference.starts_with('#'));
    }
}
