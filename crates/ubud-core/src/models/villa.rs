//! Villa model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Villa entity
///
/// Only the fields bookings and reports need; listing content (images,
/// amenities, map data) stays with the website.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Villa {
    /// Unique identifier (UUID)
    pub id: Uuid,

    pub name: String,

    pub location: String,

    pub bedrooms: i32,

    pub bathrooms: i32,

    /// Maximum number of guests allowed
    pub max_guests: i32,

    /// Nightly rate
    pub price_per_night: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Villa {
    /// Price of a stay before any promo
    #[inline]
    pub fn stay_subtotal(&self, nights: i64) -> Decimal {
        self.price_per_night * Decimal::from(nights)
    }

    /// Check if the villa can host the given party size
    pub fn fits_guests(&self, guests: i32) -> bool {
        guests >= 1 && guests <= self.max_guests
    }
}

impl Default for Villa {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            location: String::new(),
            bedrooms: 1,
            bathrooms: 1,
            max_guests: 2,
            price_per_night: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }
}
