//! Stay price quotes
//!
//! Combines a villa's nightly rate with an optional promo into the price
//! breakdown shown before booking.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use ubud_core::{
    models::{BookingContext, PricingResult, Promo, StayRange, Villa},
    AppError, AppResult,
};

use crate::promo_pricing::evaluate_promo;

/// Price breakdown of a stay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StayQuote {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub nightly_rate: Decimal,
    /// Nights x nightly rate
    pub subtotal: Decimal,
    /// Uppercased promo code, when one was supplied
    pub promo_code: Option<String>,
    /// Promo evaluation, when a promo was supplied
    pub pricing: Option<PricingResult>,
    /// Amount the guest pays
    pub total: Decimal,
}

impl StayQuote {
    /// Discount granted, zero when no promo applied
    pub fn discount(&self) -> Decimal {
        self.pricing
            .map(|p| p.discount_amount)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Quote a stay at a villa, optionally with a promo
///
/// # Errors
///
/// Returns `InvalidRange` when `check_in >= check_out`, and `InvalidInput`
/// when the stay is longer than `max_nights`.
pub fn quote_stay(
    villa: &Villa,
    check_in: NaiveDate,
    check_out: NaiveDate,
    promo: Option<&Promo>,
    today: NaiveDate,
    max_nights: i64,
) -> AppResult<StayQuote> {
    let stay = StayRange::new(check_in, check_out)?;
    let nights = stay.nights();

    if nights > max_nights {
        return Err(AppError::InvalidInput(format!(
            "Stays are limited to {} nights, requested {}",
            max_nights, nights
        )));
    }

    let subtotal = villa.stay_subtotal(nights);

    let pricing = promo.map(|p| {
        let ctx = BookingContext::new(nights, subtotal).for_villa(villa.id);
        evaluate_promo(p, &ctx, today)
    });

    let total = pricing.map(|p| p.final_total).unwrap_or(subtotal);

    Ok(StayQuote {
        check_in,
        check_out,
        nights,
        nightly_rate: villa.price_per_night,
        subtotal,
        promo_code: promo.map(|p| Promo::normalize_code(&p.code)),
        pricing,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use ubud_core::models::{DiscountType, PromoRejection};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn villa() -> Villa {
        Villa {
            name: "Villa Sawah".to_string(),
            price_per_night: dec!(1000000),
            ..Default::default()
        }
    }

    #[test]
    fn test_quote_without_promo() {
        let quote =
            quote_stay(&villa(), date(2024, 6, 1), date(2024, 6, 4), None, date(2024, 5, 1), 90)
                .unwrap();

        assert_eq!(quote.nights, 3);
        assert_eq!(quote.subtotal, dec!(3000000));
        assert_eq!(quote.total, dec!(3000000));
        assert_eq!(quote.discount(), Decimal::ZERO);
        assert!(quote.pricing.is_none());
    }

    #[test]
    fn test_quote_with_eligible_promo() {
        let promo = Promo {
            code: "ubud10".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: dec!(10),
            min_stay_nights: 2,
            valid_from: date(2024, 1, 1),
            valid_until: Some(date(2024, 12, 31)),
            ..Default::default()
        };

        let quote = quote_stay(
            &villa(),
            date(2024, 6, 1),
            date(2024, 6, 4),
            Some(&promo),
            date(2024, 6, 1),
            90,
        )
        .unwrap();

        assert_eq!(quote.promo_code.as_deref(), Some("UBUD10"));
        assert_eq!(quote.discount(), dec!(300000));
        assert_eq!(quote.total, dec!(2700000));
    }

    #[test]
    fn test_quote_with_rejected_promo_keeps_subtotal() {
        let promo = Promo {
            code: "LONGSTAY".to_string(),
            discount_value: dec!(20),
            min_stay_nights: 7,
            valid_from: date(2024, 1, 1),
            ..Default::default()
        };

        let quote = quote_stay(
            &villa(),
            date(2024, 6, 1),
            date(2024, 6, 4),
            Some(&promo),
            date(2024, 6, 1),
            90,
        )
        .unwrap();

        let pricing = quote.pricing.unwrap();
        assert_eq!(pricing.reason, Some(PromoRejection::MinStayNotMet));
        assert_eq!(quote.total, quote.subtotal);
    }

    #[test]
    fn test_quote_rejects_bad_ranges() {
        let err = quote_stay(&villa(), date(2024, 6, 4), date(2024, 6, 1), None, date(2024, 6, 1), 90)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRange(_)));

        let err = quote_stay(&villa(), date(2024, 6, 1), date(2024, 9, 30), None, date(2024, 6, 1), 90)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
