//! Business logic services for StayinUBUD
//!
//! This crate holds the booking rules of the villa back-office: whether a
//! stay can be booked, what a promo code is worth, and the admin reports.
//!
//! # Architecture
//!
//! - `availability` and `promo_pricing` are pure, synchronous engines over
//!   snapshots handed in by the caller. They perform no I/O and hold no
//!   state, so they are safe to call from any number of tasks at once.
//! - `BookingService` and `ReportService` fetch those snapshots through the
//!   repository traits from `ubud-core` and apply the resulting mutations.
//! - All service operations are instrumented with tracing.
//!
//! # Services
//!
//! - `availability` - Half-open overlap checks and month calendars
//! - `promo_pricing` - Promo eligibility and discount computation
//! - `quote` - Stay price breakdown with an optional promo
//! - `BookingService` - Availability, quotes, confirmation and cancellation
//! - `ReportService` - CSV exports and booking statistics

pub mod availability;
pub mod booking_service;
pub mod promo_pricing;
pub mod quote;
pub mod reports;

#[cfg(test)]
mod test_support;

pub use availability::{conflicting_reservations, day_status_for_month, is_range_available};
pub use booking_service::{
    AvailabilityResult, BookingConfirmation, BookingService, PromoListing, PromoSummary,
};
pub use promo_pricing::{compute_discount, evaluate_promo, is_currently_valid};
pub use quote::{quote_stay, StayQuote};
pub use reports::{CsvExport, ReportKind, ReportService, ReportStats};

/// Business logic constants
pub mod constants {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// Divisor for percentage discounts
    pub const ONE_HUNDRED: Decimal = dec!(100);

    /// Longest stay quoted when no configuration is supplied
    pub const DEFAULT_MAX_STAY_NIGHTS: i64 = 90;

    /// Rows per CSV export when no configuration is supplied
    pub const DEFAULT_EXPORT_ROW_LIMIT: i64 = 100_000;

    /// Villas listed in the report's top table
    pub const TOP_VILLAS: usize = 5;

    /// Placeholder for missing optional values in exports
    pub const EMPTY_CELL: &str = "-";
}
