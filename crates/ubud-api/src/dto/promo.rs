//! Promo evaluation DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ubud_core::{
    models::{BookingContext, DiscountType, PricingResult, Promo, PromoRejection},
    traits::PaginationMeta,
};
use ubud_services::{PromoListing, PromoSummary};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Evaluate a promo code against a booking
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EvaluatePromoRequest {
    #[validate(length(min = 1, max = 50))]
    pub code: String,

    /// Nights booked
    #[validate(range(min = 1, max = 365))]
    pub nights: i64,

    /// Booking subtotal before discount
    #[validate(custom(function = "validate_non_negative"))]
    pub subtotal: Decimal,

    /// Villa being booked; enables the villa restriction check
    pub villa_id: Option<Uuid>,
}

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("negative_amount"));
    }
    Ok(())
}

impl EvaluatePromoRequest {
    /// Booking context handed to the pricing engine
    pub fn context(&self) -> BookingContext {
        let ctx = BookingContext::new(self.nights, self.subtotal);
        match self.villa_id {
            Some(villa_id) => ctx.for_villa(villa_id),
            None => ctx,
        }
    }
}

/// Evaluation outcome
#[derive(Debug, Clone, Serialize)]
pub struct EvaluatePromoResponse {
    pub code: String,
    pub name: String,
    /// e.g. "10% OFF"
    pub label: String,
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<PromoRejection>,
    /// Human readable rejection, shown under the promo field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub discount_amount: Decimal,
    pub final_total: Decimal,
}

impl EvaluatePromoResponse {
    pub fn new(promo: &Promo, result: PricingResult) -> Self {
        Self {
            code: promo.code.clone(),
            name: promo.name.clone(),
            label: promo.discount_label(),
            eligible: result.eligible,
            reason: result.reason,
            message: result.reason.map(|r| r.message(promo)),
            discount_amount: result.discount_amount,
            final_total: result.final_total,
        }
    }
}

/// Promo row in the admin list
#[derive(Debug, Clone, Serialize)]
pub struct PromoResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub label: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_stay_nights: i32,
    pub min_booking_amount: Decimal,
    pub max_discount_amount: Option<Decimal>,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub valid_from: NaiveDate,
    pub valid_until: Option<NaiveDate>,
    pub is_active: bool,
    /// Active and inside its validity window today
    pub currently_valid: bool,
}

impl From<PromoSummary> for PromoResponse {
    fn from(summary: PromoSummary) -> Self {
        let promo = summary.promo;
        Self {
            label: promo.discount_label(),
            id: promo.id,
            code: promo.code,
            name: promo.name,
            description: promo.description,
            discount_type: promo.discount_type,
            discount_value: promo.discount_value,
            min_stay_nights: promo.min_stay_nights,
            min_booking_amount: promo.min_booking_amount,
            max_discount_amount: promo.max_discount_amount,
            usage_limit: promo.usage_limit,
            used_count: promo.used_count,
            valid_from: promo.valid_from,
            valid_until: promo.valid_until,
            is_active: promo.is_active,
            currently_valid: summary.currently_valid,
        }
    }
}

/// Admin promo list page
#[derive(Debug, Clone, Serialize)]
pub struct PromoListResponse {
    pub data: Vec<PromoResponse>,
    pub pagination: PaginationMeta,
    /// Promos valid today, across all pages
    pub active_now: usize,
}

impl PromoListResponse {
    pub fn new(listing: PromoListing, pagination: PaginationMeta) -> Self {
        Self {
            data: listing.promos.into_iter().map(Into::into).collect(),
            pagination,
            active_now: listing.active_now,
        }
    }
}
