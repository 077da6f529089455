//! Activity log repository implementation

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::{debug, error, instrument};
use ubud_core::{
    models::{ActivityLog, ActivityLogData},
    traits::ActivityLogRepository,
    AppError, AppResult,
};

/// PostgreSQL implementation of ActivityLogRepository
pub struct PgActivityLogRepository {
    pool: PgPool,
}

impl PgActivityLogRepository {
    /// Create a new activity log repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: PgRow) -> ActivityLog {
        ActivityLog {
            id: row.get("id"),
            user_id: row.get("user_id"),
            user_email: row.get("user_email"),
            action: row.get("action"),
            entity_type: row.get("entity_type"),
            entity_id: row.get("entity_id"),
            entity_name: row.get("entity_name"),
            details: row.get("details"),
            ip_address: row.get("ip_address"),
            user_agent: row.get("user_agent"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl ActivityLogRepository for PgActivityLogRepository {
    #[instrument(skip(self, data), fields(action = %data.action))]
    async fn create(&self, data: ActivityLogData) -> AppResult<ActivityLog> {
        debug!(
            "Creating activity log: {} on {:?}",
            data.action, data.entity_type
        );

        sqlx::query(
            r#"
            INSERT INTO activity_logs (
                user_id, user_email, action, entity_type, entity_id,
                entity_name, details, ip_address, user_agent
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                id, user_id, user_email, action, entity_type, entity_id,
                entity_name, details, ip_address, user_agent, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(&data.user_email)
        .bind(&data.action)
        .bind(&data.entity_type)
        .bind(&data.entity_id)
        .bind(&data.entity_name)
        .bind(&data.details)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .map(Self::map_row)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating activity log: {}", e);
            AppError::Database(format!("Failed to create activity log: {}", e))
        })
    }

    #[instrument(skip(self))]
    async fn list_filtered(
        &self,
        action: Option<&str>,
        entity_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<ActivityLog>, i64)> {
        debug!(
            "Listing activity logs: action={:?}, entity_type={:?}, limit={}, offset={}",
            action, entity_type, limit, offset
        );

        let total: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM activity_logs
            WHERE ($1::text IS NULL OR action = $1)
              AND ($2::text IS NULL OR entity_type = $2)
            "#,
        )
        .bind(action)
        .bind(entity_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error counting activity logs: {}", e);
            AppError::Database(format!("Failed to count activity logs: {}", e))
        })?;

        let logs = sqlx::query(
            r#"
            SELECT
                id, user_id, user_email, action, entity_type, entity_id,
                entity_name, details, ip_address, user_agent, created_at
            FROM activity_logs
            WHERE ($1::text IS NULL OR action = $1)
              AND ($2::text IS NULL OR entity_type = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(action)
        .bind(entity_type)
        .bind(limit)
        .bind(offset)
        .map(Self::map_row)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error fetching activity logs: {}", e);
            AppError::Database(format!("Failed to fetch activity logs: {}", e))
        })?;

        Ok((logs, total.0))
    }
}
