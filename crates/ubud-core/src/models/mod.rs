//! Domain models for StayinUBUD
//!
//! This module contains all the core domain models used throughout the application.

pub mod activity;
pub mod booking;
pub mod calendar;
pub mod promo;
pub mod villa;

pub use activity::{ActivityLog, ActivityLogBuilder, ActivityLogData};
pub use booking::{Booking, BookingStatus, ConfirmOutcome, Reservation, StayRange};
pub use calendar::{DayStatus, Occupancy};
pub use promo::{BookingContext, DiscountType, PricingResult, Promo, PromoRejection};
pub use villa::Villa;
