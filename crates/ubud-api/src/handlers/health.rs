//! Health check handler

use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use tracing::warn;

/// Health check endpoint
///
/// GET /api/v1/health
pub async fn health_check(pool: web::Data<PgPool>) -> HttpResponse {
    match ubud_db::pool::ping(pool.get_ref()).await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "healthy",
            "service": "stayinubud",
            "database": "up",
            "version": env!("CARGO_PKG_VERSION"),
        })),
        Err(e) => {
            warn!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "degraded",
                "service": "stayinubud",
                "database": "down",
                "version": env!("CARGO_PKG_VERSION"),
            }))
        }
    }
}
