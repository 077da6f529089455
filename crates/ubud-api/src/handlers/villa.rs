//! Villa handlers
//!
//! Availability checks, month calendars and price quotes for a single villa.

use crate::dto::{
    ApiResponse, AvailabilityResponse, CalendarQuery, CalendarResponse, QuoteQuery, QuoteResponse,
    StayQuery,
};
use actix_web::{web, HttpResponse};
use chrono::{Datelike, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};
use ubud_core::{config::BookingConfig, AppError};
use uuid::Uuid;

use super::booking_service;

/// Check whether a villa is free for a stay
///
/// GET /api/v1/villas/{id}/availability?check_in=2024-06-01&check_out=2024-06-04
#[instrument(skip(pool, config))]
pub async fn check_availability(
    pool: web::Data<PgPool>,
    config: web::Data<BookingConfig>,
    path: web::Path<Uuid>,
    query: web::Query<StayQuery>,
) -> Result<HttpResponse, AppError> {
    let villa_id = path.into_inner();
    let (check_in, check_out) = query.dates()?;

    let result = booking_service(pool.get_ref(), config.get_ref())
        .check_availability(villa_id, check_in, check_out)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(AvailabilityResponse::from(result))))
}

/// Day-by-day calendar for one month
///
/// GET /api/v1/villas/{id}/calendar?year=2024&month=6
#[instrument(skip(pool, config))]
pub async fn get_calendar(
    pool: web::Data<PgPool>,
    config: web::Data<BookingConfig>,
    path: web::Path<Uuid>,
    query: web::Query<CalendarQuery>,
) -> Result<HttpResponse, AppError> {
    let villa_id = path.into_inner();
    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    debug!("Building calendar for villa {} {}-{:02}", villa_id, year, month);

    let days = booking_service(pool.get_ref(), config.get_ref())
        .month_calendar(villa_id, year, month, today)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(CalendarResponse {
        villa_id,
        year,
        month,
        days: days.into_iter().map(Into::into).collect(),
    })))
}

/// Price a stay with an optional promo code
///
/// GET /api/v1/villas/{id}/quote?check_in=2024-06-01&check_out=2024-06-04&promo_code=UBUD10
#[instrument(skip(pool, config))]
pub async fn get_quote(
    pool: web::Data<PgPool>,
    config: web::Data<BookingConfig>,
    path: web::Path<Uuid>,
    query: web::Query<QuoteQuery>,
) -> Result<HttpResponse, AppError> {
    let villa_id = path.into_inner();
    let (check_in, check_out) = query.dates()?;
    let today = Utc::now().date_naive();

    let quote = booking_service(pool.get_ref(), config.get_ref())
        .quote(villa_id, check_in, check_out, query.promo_code.as_deref(), today)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(QuoteResponse::from_quote(
        villa_id,
        quote,
        &config.currency,
    ))))
}

/// Configure villa routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/villas")
            .route("/{id}/availability", web::get().to(check_availability))
            .route("/{id}/calendar", web::get().to(get_calendar))
            .route("/{id}/quote", web::get().to(get_quote)),
    );
}
