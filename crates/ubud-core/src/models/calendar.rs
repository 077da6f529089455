//! Calendar rendering models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Booking state of a single calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Occupancy {
    #[default]
    Available,
    /// Covered by a pending booking
    Pending,
    /// Covered by a confirmed booking
    Booked,
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occupancy::Available => write!(f, "available"),
            Occupancy::Pending => write!(f, "pending"),
            Occupancy::Booked => write!(f, "booked"),
        }
    }
}

/// One day of a villa's month calendar
///
/// `is_past` and `occupancy` are independent; the renderer decides which wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStatus {
    pub date: NaiveDate,
    pub is_past: bool,
    pub occupancy: Occupancy,
}

impl DayStatus {
    /// Check if a guest could pick this day as a new arrival
    pub fn is_selectable(&self) -> bool {
        !self.is_past && self.occupancy == Occupancy::Available
    }
}
