//! Booking handlers
//!
//! Admin list plus the confirm and cancel actions. The acting admin is read
//! from the `X-Admin-Email` header for the activity log.

use crate::dto::{
    ApiResponse, BookingFilterParams, BookingResponse, ConfirmBookingResponse, PaginationParams,
};
use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use ubud_core::{config::BookingConfig, AppError};
use uuid::Uuid;
use validator::Validate;

use super::{admin_email, booking_service};

/// List bookings with pagination and filters
///
/// GET /api/v1/bookings?status=pending&villa_id=...&page=1&per_page=50
#[instrument(skip(pool, config))]
pub async fn list_bookings(
    pool: web::Data<PgPool>,
    config: web::Data<BookingConfig>,
    query: web::Query<PaginationParams>,
    filters: web::Query<BookingFilterParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let status = filters.status()?;

    debug!(
        page = query.page,
        per_page = query.per_page,
        status = ?status,
        villa_id = ?filters.villa_id,
        "Listing bookings"
    );

    let (bookings, total) = booking_service(pool.get_ref(), config.get_ref())
        .list_bookings(status, filters.villa_id, &query.pagination())
        .await?;

    let data: Vec<BookingResponse> = bookings.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(query.paginate(data, total)))
}

/// Confirm a pending booking
///
/// POST /api/v1/bookings/{id}/confirm
#[instrument(skip(pool, config, req))]
pub async fn confirm_booking(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<BookingConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let booking_id = path.into_inner();
    let actor = admin_email(&req);

    let confirmation = booking_service(pool.get_ref(), config.get_ref())
        .confirm_booking(booking_id, actor.as_deref())
        .await?;

    let message = if confirmation.newly_confirmed {
        info!(booking_id = %booking_id, actor = ?actor, "Booking confirmed");
        "Booking confirmed"
    } else {
        "Booking was already confirmed"
    };

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        ConfirmBookingResponse::from(confirmation),
        message,
    )))
}

/// Cancel a booking
///
/// POST /api/v1/bookings/{id}/cancel
#[instrument(skip(pool, config, req))]
pub async fn cancel_booking(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<BookingConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let booking_id = path.into_inner();
    let actor = admin_email(&req);

    let booking = booking_service(pool.get_ref(), config.get_ref())
        .cancel_booking(booking_id, actor.as_deref())
        .await?;

    info!(booking_id = %booking_id, actor = ?actor, "Booking cancelled");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        BookingResponse::from(booking),
        "Booking cancelled",
    )))
}

/// Configure booking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .route("", web::get().to(list_bookings))
            .route("/{id}/confirm", web::post().to(confirm_booking))
            .route("/{id}/cancel", web::post().to(cancel_booking)),
    );
}
