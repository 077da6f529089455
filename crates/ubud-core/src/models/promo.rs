//! Promo code models
//!
//! A promo is immutable configuration owned by the store. Evaluating one
//! against a booking produces a `PricingResult`; ineligibility is a normal
//! outcome carried in `PricingResult::reason`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// How the discount value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` is a percentage (0-100) of the subtotal
    #[default]
    Percentage,
    /// `discount_value` is a currency amount
    Fixed,
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountType::Percentage => write!(f, "percentage"),
            DiscountType::Fixed => write!(f, "fixed"),
        }
    }
}

impl DiscountType {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "percentage" => Some(DiscountType::Percentage),
            "fixed" => Some(DiscountType::Fixed),
            _ => None,
        }
    }
}

/// Promo code entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promo {
    /// Unique identifier (UUID)
    pub id: Uuid,

    /// Case-insensitive code, stored uppercased
    pub code: String,

    /// Display name
    pub name: String,

    pub description: Option<String>,

    pub discount_type: DiscountType,

    /// Percentage (0-100) or fixed amount depending on `discount_type`
    pub discount_value: Decimal,

    /// Minimum number of nights, at least 1
    pub min_stay_nights: i32,

    /// Minimum subtotal before discount
    pub min_booking_amount: Decimal,

    /// Cap on the discount amount
    pub max_discount_amount: Option<Decimal>,

    /// Maximum number of redemptions (None = unlimited)
    pub usage_limit: Option<i32>,

    /// Redemptions so far, incremented by the store on confirmation
    pub used_count: i32,

    /// First valid day
    pub valid_from: NaiveDate,

    /// Last valid day, inclusive (None = open ended)
    pub valid_until: Option<NaiveDate>,

    /// Villas the promo is limited to (None or empty = all villas)
    pub applicable_villas: Option<Vec<Uuid>>,

    /// Admin on/off switch, independent of the validity window
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Promo {
    /// Normalize a code for lookup and comparison
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    /// Check if the given code refers to this promo
    pub fn matches_code(&self, code: &str) -> bool {
        Self::normalize_code(&self.code) == Self::normalize_code(code)
    }

    /// Check if the promo may be used for the given villa
    pub fn applies_to_villa(&self, villa_id: Uuid) -> bool {
        match &self.applicable_villas {
            Some(villas) if !villas.is_empty() => villas.contains(&villa_id),
            _ => true,
        }
    }

    /// Redemptions left, if the promo is limited
    pub fn remaining_uses(&self) -> Option<i32> {
        self.usage_limit
            .map(|limit| (limit - self.used_count).max(0))
    }

    /// Short label such as "10% OFF"
    pub fn discount_label(&self) -> String {
        match self.discount_type {
            DiscountType::Percentage => format!("{}% OFF", self.discount_value.normalize()),
            DiscountType::Fixed => format!("{} OFF", self.discount_value.normalize()),
        }
    }
}

impl Default for Promo {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            code: String::new(),
            name: String::new(),
            description: None,
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::ZERO,
            min_stay_nights: 1,
            min_booking_amount: Decimal::ZERO,
            max_discount_amount: None,
            usage_limit: None,
            used_count: 0,
            valid_from: now.date_naive(),
            valid_until: None,
            applicable_villas: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Booking details a promo is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingContext {
    pub nights: i64,
    /// Stay price before discount
    pub subtotal: Decimal,
    /// Villa being booked, when known
    pub villa_id: Option<Uuid>,
}

impl BookingContext {
    pub fn new(nights: i64, subtotal: Decimal) -> Self {
        Self {
            nights,
            subtotal,
            villa_id: None,
        }
    }

    pub fn for_villa(mut self, villa_id: Uuid) -> Self {
        self.villa_id = Some(villa_id);
        self
    }
}

/// Why a promo cannot be applied, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromoRejection {
    Inactive,
    NotYetValid,
    Expired,
    UsageLimitReached,
    MinStayNotMet,
    MinAmountNotMet,
    VillaNotEligible,
}

impl PromoRejection {
    /// Stable identifier used in API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            PromoRejection::Inactive => "inactive",
            PromoRejection::NotYetValid => "not_yet_valid",
            PromoRejection::Expired => "expired",
            PromoRejection::UsageLimitReached => "usage_limit_reached",
            PromoRejection::MinStayNotMet => "min_stay_not_met",
            PromoRejection::MinAmountNotMet => "min_amount_not_met",
            PromoRejection::VillaNotEligible => "villa_not_eligible",
        }
    }

    /// Human readable explanation for the guest
    pub fn message(&self, promo: &Promo) -> String {
        match self {
            PromoRejection::Inactive => "This promo code is no longer active".to_string(),
            PromoRejection::NotYetValid => {
                format!("This promo code is valid from {}", promo.valid_from)
            }
            PromoRejection::Expired => match promo.valid_until {
                Some(until) => format!("This promo code expired on {}", until),
                None => "This promo code has expired".to_string(),
            },
            PromoRejection::UsageLimitReached => {
                "This promo code has reached its usage limit".to_string()
            }
            PromoRejection::MinStayNotMet => match promo.min_stay_nights {
                1 => "Minimum stay of 1 night required".to_string(),
                n => format!("Minimum stay of {} nights required", n),
            },
            PromoRejection::MinAmountNotMet => format!(
                "Minimum booking amount of {} required",
                promo.min_booking_amount.normalize()
            ),
            PromoRejection::VillaNotEligible => {
                "This promo code does not apply to the selected villa".to_string()
            }
        }
    }
}

impl fmt::Display for PromoRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating a promo against a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<PromoRejection>,
    pub discount_amount: Decimal,
    pub final_total: Decimal,
}

impl PricingResult {
    /// Applied discount; the total never drops below zero
    pub fn eligible(subtotal: Decimal, discount_amount: Decimal) -> Self {
        Self {
            eligible: true,
            reason: None,
            discount_amount,
            final_total: (subtotal - discount_amount).max(Decimal::ZERO),
        }
    }

    /// Rejected promo: no discount, subtotal unchanged
    pub fn rejected(reason: PromoRejection, subtotal: Decimal) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
            discount_amount: Decimal::ZERO,
            final_total: subtotal,
        }
    }
}
