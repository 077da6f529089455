//! Data transfer objects for API requests and responses

pub mod activity;
pub mod availability;
pub mod booking;
pub mod common;
pub mod promo;
pub mod report;

pub use activity::ActivityFilterParams;
pub use availability::{
    AvailabilityResponse, CalendarQuery, CalendarResponse, DayResponse, QuoteQuery, QuoteResponse,
    StayQuery,
};
pub use booking::{BookingFilterParams, BookingResponse, ConfirmBookingResponse};
pub use common::{ApiResponse, DateWindowParams, PaginationParams};
pub use promo::{EvaluatePromoRequest, EvaluatePromoResponse, PromoListResponse, PromoResponse};
pub use report::ExportParams;
