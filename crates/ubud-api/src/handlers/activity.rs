//! Activity log handlers

use crate::dto::{ActivityFilterParams, PaginationParams};
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use tracing::{debug, instrument, warn};
use ubud_core::{config::BookingConfig, AppError};
use validator::Validate;

use super::booking_service;

/// List activity log entries, newest first
///
/// GET /api/v1/activity-logs?action=update&entity_type=booking&page=1&per_page=50
#[instrument(skip(pool, config))]
pub async fn list_activity_logs(
    pool: web::Data<PgPool>,
    config: web::Data<BookingConfig>,
    query: web::Query<PaginationParams>,
    filters: web::Query<ActivityFilterParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(
        page = query.page,
        per_page = query.per_page,
        action = ?filters.action(),
        entity_type = ?filters.entity_type(),
        "Listing activity logs"
    );

    let (logs, total) = booking_service(pool.get_ref(), config.get_ref())
        .list_activity(filters.action(), filters.entity_type(), &query.pagination())
        .await?;

    Ok(HttpResponse::Ok().json(query.paginate(logs, total)))
}

/// Configure activity log routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/activity-logs").route("", web::get().to(list_activity_logs)));
}
