//! Promo pricing engine
//!
//! Decides whether a promo applies to a booking and what it is worth.
//! Evaluation is pure: it never advances `used_count`, which the store bumps
//! once per confirmed booking.
//!
//! Checks run in a fixed order and stop at the first failure, so the reported
//! reason is always the earliest rule that was broken:
//!
//! 1. active flag
//! 2. `valid_from <= today`
//! 3. `today <= valid_until` (when set)
//! 4. `used_count < usage_limit` (when set)
//! 5. minimum stay
//! 6. minimum subtotal
//! 7. villa restriction (when the booking names a villa)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use ubud_core::models::{BookingContext, DiscountType, PricingResult, Promo, PromoRejection};

use crate::constants::ONE_HUNDRED;

/// Validity window and switches only (checks 1-3)
///
/// Used for the "currently valid" counters in the admin promo list.
pub fn is_currently_valid(promo: &Promo, today: NaiveDate) -> bool {
    validity_rejection(promo, today).is_none()
}

fn validity_rejection(promo: &Promo, today: NaiveDate) -> Option<PromoRejection> {
    if !promo.is_active {
        return Some(PromoRejection::Inactive);
    }

    if promo.valid_from > today {
        return Some(PromoRejection::NotYetValid);
    }

    if let Some(until) = promo.valid_until {
        if today > until {
            return Some(PromoRejection::Expired);
        }
    }

    None
}

fn eligibility_rejection(
    promo: &Promo,
    ctx: &BookingContext,
    today: NaiveDate,
) -> Option<PromoRejection> {
    if let Some(reason) = validity_rejection(promo, today) {
        return Some(reason);
    }

    if let Some(limit) = promo.usage_limit {
        if promo.used_count >= limit {
            return Some(PromoRejection::UsageLimitReached);
        }
    }

    if ctx.nights < i64::from(promo.min_stay_nights) {
        return Some(PromoRejection::MinStayNotMet);
    }

    if ctx.subtotal < promo.min_booking_amount {
        return Some(PromoRejection::MinAmountNotMet);
    }

    if let Some(villa_id) = ctx.villa_id {
        if !promo.applies_to_villa(villa_id) {
            return Some(PromoRejection::VillaNotEligible);
        }
    }

    None
}

/// Discount a promo is worth on a subtotal, ignoring eligibility
///
/// Percentage discounts take `discount_value`% of the subtotal, fixed
/// discounts are clamped to the subtotal, and `max_discount_amount` caps
/// either. The result always lies within `0..=subtotal`, and a product too
/// large for `Decimal` is treated as the whole subtotal.
pub fn compute_discount(promo: &Promo, subtotal: Decimal) -> Decimal {
    let raw = match promo.discount_type {
        DiscountType::Percentage => subtotal
            .checked_mul(promo.discount_value / ONE_HUNDRED)
            .unwrap_or(subtotal),
        DiscountType::Fixed => promo.discount_value.min(subtotal),
    };

    let capped = match promo.max_discount_amount {
        Some(cap) => raw.min(cap),
        None => raw,
    };

    capped.min(subtotal).max(Decimal::ZERO)
}

/// Evaluate a promo against a booking on the given day
pub fn evaluate_promo(promo: &Promo, ctx: &BookingContext, today: NaiveDate) -> PricingResult {
    match eligibility_rejection(promo, ctx, today) {
        Some(reason) => PricingResult::rejected(reason, ctx.subtotal),
        None => PricingResult::eligible(ctx.subtotal, compute_discount(promo, ctx.subtotal)),
    }
}
