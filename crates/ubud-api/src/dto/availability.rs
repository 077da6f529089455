//! Availability, calendar and quote DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ubud_core::{
    dates,
    models::{BookingStatus, DayStatus, Occupancy, PricingResult, PromoRejection, Reservation},
    AppResult,
};
use ubud_services::{AvailabilityResult, StayQuote};
use uuid::Uuid;

/// Candidate stay as sent by the booking form
#[derive(Debug, Clone, Deserialize)]
pub struct StayQuery {
    /// Arrival day, `YYYY-MM-DD` or an RFC 3339 timestamp
    pub check_in: String,
    /// Departure day
    pub check_out: String,
}

impl StayQuery {
    /// Parse both days
    pub fn dates(&self) -> AppResult<(NaiveDate, NaiveDate)> {
        Ok((
            dates::parse_date(&self.check_in)?,
            dates::parse_date(&self.check_out)?,
        ))
    }
}

/// Month selector; missing parts fall back to the current month
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Quote request
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteQuery {
    pub check_in: String,
    pub check_out: String,
    pub promo_code: Option<String>,
}

impl QuoteQuery {
    /// Parse both days
    pub fn dates(&self) -> AppResult<(NaiveDate, NaiveDate)> {
        Ok((
            dates::parse_date(&self.check_in)?,
            dates::parse_date(&self.check_out)?,
        ))
    }
}

/// A reservation blocking the requested stay
#[derive(Debug, Clone, Serialize)]
pub struct ConflictResponse {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: BookingStatus,
}

impl From<Reservation> for ConflictResponse {
    fn from(r: Reservation) -> Self {
        Self {
            check_in: r.check_in,
            check_out: r.check_out,
            status: r.status,
        }
    }
}

/// Availability response
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResponse {
    pub villa_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub available: bool,
    pub conflicts: Vec<ConflictResponse>,
}

impl From<AvailabilityResult> for AvailabilityResponse {
    fn from(r: AvailabilityResult) -> Self {
        Self {
            villa_id: r.villa_id,
            check_in: r.check_in,
            check_out: r.check_out,
            nights: r.nights,
            available: r.available,
            conflicts: r.conflicts.into_iter().map(Into::into).collect(),
        }
    }
}

/// One calendar cell
#[derive(Debug, Clone, Serialize)]
pub struct DayResponse {
    pub date: NaiveDate,
    pub status: Occupancy,
    pub is_past: bool,
    /// Free and not in the past
    pub selectable: bool,
}

impl From<DayStatus> for DayResponse {
    fn from(d: DayStatus) -> Self {
        Self {
            date: d.date,
            status: d.occupancy,
            is_past: d.is_past,
            selectable: d.is_selectable(),
        }
    }
}

/// Month calendar response
#[derive(Debug, Clone, Serialize)]
pub struct CalendarResponse {
    pub villa_id: Uuid,
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayResponse>,
}

/// Promo part of a quote
#[derive(Debug, Clone, Serialize)]
pub struct QuotePromoResponse {
    pub code: String,
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<PromoRejection>,
    pub discount_amount: Decimal,
}

/// Quote response
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub villa_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub nightly_rate: Decimal,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo: Option<QuotePromoResponse>,
}

impl QuoteResponse {
    /// Build from a service quote
    pub fn from_quote(villa_id: Uuid, quote: StayQuote, currency: &str) -> Self {
        let promo = match (&quote.promo_code, quote.pricing) {
            (Some(code), Some(PricingResult { eligible, reason, discount_amount, .. })) => {
                Some(QuotePromoResponse {
                    code: code.clone(),
                    eligible,
                    reason,
                    discount_amount,
                })
            }
            _ => None,
        };

        Self {
            villa_id,
            check_in: quote.check_in,
            check_out: quote.check_out,
            nights: quote.nights,
            nightly_rate: quote.nightly_rate,
            subtotal: quote.subtotal,
            discount_amount: quote.discount(),
            total: quote.total,
            currency: currency.to_string(),
            promo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use ubud_core::AppError;

    #[test]
    fn test_stay_query_parsing() {
        let query = StayQuery {
            check_in: "2024-06-01".to_string(),
            check_out: "2024-06-04T00:00:00+08:00".to_string(),
        };
        let (check_in, check_out) = query.dates().unwrap();
        assert_eq!((check_out - check_in).num_days(), 3);

        let bad = StayQuery {
            check_in: "01/06/2024".to_string(),
            check_out: "2024-06-04".to_string(),
        };
        assert!(matches!(bad.dates(), Err(AppError::InvalidDate(_))));
    }

    #[test]
    fn test_day_response_selectable() {
        let day = DayStatus {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            is_past: false,
            occupancy: Occupancy::Pending,
        };
        let response = DayResponse::from(day);
        assert!(!response.selectable);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_quote_response_with_rejected_promo() {
        let quote = StayQuote {
            check_in: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
            nights: 1,
            nightly_rate: dec!(1000000),
            subtotal: dec!(1000000),
            promo_code: Some("UBUD10".to_string()),
            pricing: Some(PricingResult::rejected(
                PromoRejection::MinStayNotMet,
                dec!(1000000),
            )),
            total: dec!(1000000),
        };

        let response = QuoteResponse::from_quote(Uuid::nil(), quote, "IDR");
        let promo = response.promo.as_ref().unwrap();
        assert!(!promo.eligible);
        assert_eq!(promo.reason, Some(PromoRejection::MinStayNotMet));
        assert_eq!(response.discount_amount, Decimal::ZERO);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["promo"]["reason"], "min_stay_not_met");
    }
}
