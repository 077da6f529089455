//! Promo repository implementation
//!
//! Codes are matched case-insensitively. Redemptions are counted by the
//! booking repository, inside the confirmation transaction.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use ubud_core::{
    models::{DiscountType, Promo},
    traits::{PromoRepository, Repository},
    AppError, AppResult,
};
use uuid::Uuid;

const PROMO_COLUMNS: &str = r#"
    id, code, name, description, discount_type, discount_value,
    min_stay_nights, min_booking_amount, max_discount_amount,
    usage_limit, used_count, valid_from, valid_until,
    applicable_villas, is_active, created_at, updated_at
"#;

/// PostgreSQL implementation of PromoRepository
pub struct PgPromoRepository {
    pool: PgPool,
}

impl PgPromoRepository {
    /// Create a new promo repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn parse_discount_type(s: &str) -> DiscountType {
        DiscountType::from_str(s).unwrap_or(DiscountType::Percentage)
    }
}

#[async_trait]
impl Repository<Promo, Uuid> for PgPromoRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Promo>> {
        let query = format!("SELECT {} FROM promos WHERE id = $1", PROMO_COLUMNS);
        let row = sqlx::query_as::<sqlx::Postgres, PromoRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding promo {}: {}", id, e);
                AppError::Database(format!("Failed to find promo: {}", e))
            })?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Promo>> {
        let query = format!(
            "SELECT {} FROM promos ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            PROMO_COLUMNS
        );
        let rows = sqlx::query_as::<sqlx::Postgres, PromoRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error listing promos: {}", e);
                AppError::Database(format!("Failed to fetch promos: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM promos")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting promos: {}", e);
                AppError::Database(format!("Failed to count promos: {}", e))
            })?;

        Ok(result.0)
    }
}

#[async_trait]
impl PromoRepository for PgPromoRepository {
    #[instrument(skip(self))]
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Promo>> {
        let code = Promo::normalize_code(code);
        debug!("Finding promo by code: {}", code);

        let query = format!(
            "SELECT {} FROM promos WHERE UPPER(code) = $1",
            PROMO_COLUMNS
        );
        let row = sqlx::query_as::<sqlx::Postgres, PromoRow>(&query)
            .bind(&code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding promo {}: {}", code, e);
                AppError::Database(format!("Failed to find promo: {}", e))
            })?;

        Ok(row.map(Into::into))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct PromoRow {
    id: Uuid,
    code: String,
    name: String,
    description: Option<String>,
    discount_type: String,
    discount_value: Decimal,
    min_stay_nights: i32,
    min_booking_amount: Option<Decimal>,
    max_discount_amount: Option<Decimal>,
    usage_limit: Option<i32>,
    used_count: i32,
    valid_from: NaiveDate,
    valid_until: Option<NaiveDate>,
    applicable_villas: Option<Vec<Uuid>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PromoRow> for Promo {
    fn from(row: PromoRow) -> Self {
        Self {
            id: row.id,
            code: Promo::normalize_code(&row.code),
            name: row.name,
            description: row.description,
            discount_type: PgPromoRepository::parse_discount_type(&row.discount_type),
            discount_value: row.discount_value,
            min_stay_nights: row.min_stay_nights.max(1),
            min_booking_amount: row.min_booking_amount.unwrap_or(Decimal::ZERO),
            max_discount_amount: row.max_discount_amount,
            usage_limit: row.usage_limit,
            used_count: row.used_count,
            valid_from: row.valid_from,
            valid_until: row.valid_until,
            applicable_villas: row.applicable_villas,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
