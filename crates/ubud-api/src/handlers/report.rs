//! Report handlers
//!
//! CSV exports and dashboard figures over a booking-creation window.

use crate::dto::{ApiResponse, DateWindowParams, ExportParams};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument};
use ubud_core::{config::BookingConfig, AppError};

use super::{admin_email, report_service};

/// Download a CSV report
///
/// GET /api/v1/reports/export?kind=bookings&from=2024-06-01&to=2024-06-30
#[instrument(skip(pool, config, req))]
pub async fn export_report(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<BookingConfig>,
    query: web::Query<ExportParams>,
) -> Result<HttpResponse, AppError> {
    let today = Utc::now().date_naive();
    let kind = query.kind()?;
    let (from, to) = query.window.resolve(today)?;

    let export = report_service(pool.get_ref(), config.get_ref())
        .export(kind, from, to, today)
        .await?;

    info!(
        kind = %export.kind,
        rows = export.rows,
        actor = ?admin_email(&req),
        "Report downloaded"
    );

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", export.filename),
        ))
        .body(export.content))
}

/// Dashboard statistics
///
/// GET /api/v1/reports/stats?from=2024-06-01&to=2024-06-30
#[instrument(skip(pool, config))]
pub async fn get_stats(
    pool: web::Data<PgPool>,
    config: web::Data<BookingConfig>,
    query: web::Query<DateWindowParams>,
) -> Result<HttpResponse, AppError> {
    let (from, to) = query.resolve(Utc::now().date_naive())?;

    let stats = report_service(pool.get_ref(), config.get_ref())
        .stats(from, to)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(stats)))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/export", web::get().to(export_report))
            .route("/stats", web::get().to(get_stats)),
    );
}
