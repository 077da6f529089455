//! HTTP request handlers

pub mod activity;
pub mod booking;
pub mod health;
pub mod promo;
pub mod report;
pub mod villa;

use actix_web::HttpRequest;
use sqlx::PgPool;
use std::sync::Arc;
use ubud_core::config::BookingConfig;
use ubud_db::{PgActivityLogRepository, PgBookingRepository, PgPromoRepository, PgVillaRepository};
use ubud_services::{BookingService, ReportService};

pub use activity::configure as configure_activity_logs;
pub use booking::configure as configure_bookings;
pub use health::health_check;
pub use promo::configure as configure_promos;
pub use report::configure as configure_reports;
pub use villa::configure as configure_villas;

/// Header carrying the signed-in admin's email, set by the auth proxy
pub const ADMIN_EMAIL_HEADER: &str = "X-Admin-Email";

/// Booking service over the PostgreSQL repositories
pub type PgBookingService =
    BookingService<PgVillaRepository, PgBookingRepository, PgPromoRepository, PgActivityLogRepository>;

/// Report service over the PostgreSQL repositories
pub type PgReportService = ReportService<PgVillaRepository, PgBookingRepository>;

pub(crate) fn booking_service(pool: &PgPool, config: &BookingConfig) -> PgBookingService {
    BookingService::new(
        Arc::new(PgVillaRepository::new(pool.clone())),
        Arc::new(PgBookingRepository::new(pool.clone())),
        Arc::new(PgPromoRepository::new(pool.clone())),
        Arc::new(PgActivityLogRepository::new(pool.clone())),
    )
    .with_max_stay_nights(config.max_stay_nights)
}

pub(crate) fn report_service(pool: &PgPool, config: &BookingConfig) -> PgReportService {
    ReportService::new(
        Arc::new(PgVillaRepository::new(pool.clone())),
        Arc::new(PgBookingRepository::new(pool.clone())),
    )
    .with_row_limit(config.export_row_limit)
    .with_top_villas(config.top_villas_limit)
}

/// Acting admin from the request headers, if present
pub(crate) fn admin_email(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(ADMIN_EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
