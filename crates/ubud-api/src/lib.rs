//! API layer for StayinUBUD
//!
//! HTTP handlers for the villa booking back-office: availability, calendars,
//! quotes, promos, booking confirmation, the activity log and reports.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod dto;
pub mod handlers;

// Re-export DTOs (common types)
pub use dto::{ApiResponse, PaginationParams};

pub use handlers::{
    configure_activity_logs, configure_bookings, configure_promos, configure_reports,
    configure_villas, health_check,
};
