//! Promo handlers

use crate::dto::{
    ApiResponse, EvaluatePromoRequest, EvaluatePromoResponse, PaginationParams, PromoListResponse,
};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use ubud_core::{config::BookingConfig, AppError};
use validator::Validate;

use super::booking_service;

/// Evaluate a promo code for a booking
///
/// Never consumes a redemption; ineligible codes return 200 with a reason.
///
/// POST /api/v1/promos/evaluate
#[instrument(skip(pool, config, req), fields(code = %req.code))]
pub async fn evaluate_promo(
    pool: web::Data<PgPool>,
    config: web::Data<BookingConfig>,
    req: web::Json<EvaluatePromoRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Promo evaluation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let today = Utc::now().date_naive();
    let (promo, result) = booking_service(pool.get_ref(), config.get_ref())
        .evaluate_code(&req.code, req.context(), today)
        .await?;

    info!(
        code = %promo.code,
        eligible = result.eligible,
        reason = ?result.reason,
        "Promo evaluated"
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(EvaluatePromoResponse::new(
        &promo, result,
    ))))
}

/// List promos for the admin, flagging the ones valid today
///
/// GET /api/v1/promos?page=1&per_page=50
#[instrument(skip(pool, config))]
pub async fn list_promos(
    pool: web::Data<PgPool>,
    config: web::Data<BookingConfig>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let today = Utc::now().date_naive();
    let listing = booking_service(pool.get_ref(), config.get_ref())
        .list_promos(&query.pagination(), today)
        .await?;

    debug!(
        total = listing.total,
        active_now = listing.active_now,
        "Listed promos"
    );

    let total = listing.total;
    Ok(HttpResponse::Ok().json(PromoListResponse::new(listing, query.metadata(total))))
}

/// Configure promo routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/promos")
            .route("", web::get().to(list_promos))
            .route("/evaluate", web::post().to(evaluate_promo)),
    );
}
