//! Villa repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use ubud_core::{
    models::Villa,
    traits::{Repository, VillaRepository},
    AppError, AppResult,
};
use uuid::Uuid;

const VILLA_COLUMNS: &str = r#"
    id, name, location, bedrooms, bathrooms, max_guests,
    price_per_night, created_at, updated_at
"#;

/// PostgreSQL implementation of VillaRepository
pub struct PgVillaRepository {
    pool: PgPool,
}

impl PgVillaRepository {
    /// Create a new villa repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Villa, Uuid> for PgVillaRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Villa>> {
        debug!("Finding villa by id: {}", id);

        let query = format!("SELECT {} FROM villas WHERE id = $1", VILLA_COLUMNS);
        let row = sqlx::query_as::<sqlx::Postgres, VillaRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding villa {}: {}", id, e);
                AppError::Database(format!("Failed to find villa: {}", e))
            })?;

        Ok(row.map(Into::into))
    }

    /// Villas ordered by name
    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Villa>> {
        let query = format!(
            "SELECT {} FROM villas ORDER BY name LIMIT $1 OFFSET $2",
            VILLA_COLUMNS
        );
        let rows = sqlx::query_as::<sqlx::Postgres, VillaRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error listing villas: {}", e);
                AppError::Database(format!("Failed to fetch villas: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM villas")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting villas: {}", e);
                AppError::Database(format!("Failed to count villas: {}", e))
            })?;

        Ok(result.0)
    }
}

#[async_trait]
impl VillaRepository for PgVillaRepository {
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Villa>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {} FROM villas WHERE id = ANY($1)", VILLA_COLUMNS);
        let rows = sqlx::query_as::<sqlx::Postgres, VillaRow>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding villas by id: {}", e);
                AppError::Database(format!("Failed to fetch villas: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct VillaRow {
    id: Uuid,
    name: String,
    location: Option<String>,
    bedrooms: i32,
    bathrooms: i32,
    max_guests: i32,
    price_per_night: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VillaRow> for Villa {
    fn from(row: VillaRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            location: row.location.unwrap_or_default(),
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            max_guests: row.max_guests,
            price_per_night: row.price_per_night,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
