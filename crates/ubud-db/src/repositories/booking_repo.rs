//! Booking repository implementation
//!
//! Status changes go through a conditional `UPDATE ... WHERE status = $from`,
//! so two admins confirming the same booking change it exactly once.
//! Confirmation runs in a transaction holding the villa row lock, with the
//! overlap guard and the promo redemption inside it.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument, warn};
use ubud_core::{
    models::{Booking, BookingStatus, ConfirmOutcome, Reservation},
    traits::{BookingRepository, Repository},
    AppError, AppResult,
};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = r#"
    id, villa_id, guest_name, guest_email, guest_phone,
    check_in, check_out, total_guests, total_price, status,
    special_requests, promo_code, created_at, updated_at
"#;

/// PostgreSQL implementation of BookingRepository
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    /// Create a new booking repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Unknown statuses are treated as pending so they keep blocking the calendar
    fn parse_status(s: &str) -> BookingStatus {
        BookingStatus::from_str(s).unwrap_or(BookingStatus::Pending)
    }
}

#[async_trait]
impl Repository<Booking, Uuid> for PgBookingRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        debug!("Finding booking by id: {}", id);

        let query = format!("SELECT {} FROM bookings WHERE id = $1", BOOKING_COLUMNS);
        let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding booking {}: {}", id, e);
                AppError::Database(format!("Failed to find booking: {}", e))
            })?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Booking>> {
        let query = format!(
            "SELECT {} FROM bookings ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            BOOKING_COLUMNS
        );
        let rows = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error listing bookings: {}", e);
                AppError::Database(format!("Failed to fetch bookings: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting bookings: {}", e);
                AppError::Database(format!("Failed to count bookings: {}", e))
            })?;

        Ok(result.0)
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    #[instrument(skip(self))]
    async fn find_active_reservations(
        &self,
        villa_id: Uuid,
        exclude: Option<Uuid>,
    ) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<sqlx::Postgres, ReservationRow>(
            r#"
            SELECT check_in, check_out, status
            FROM bookings
            WHERE villa_id = $1
              AND status IN ('pending', 'confirmed')
              AND ($2::uuid IS NULL OR id <> $2)
            ORDER BY check_in
            "#,
        )
        .bind(villa_id)
        .bind(exclude)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error loading reservations for villa {}: {}", villa_id, e);
            AppError::Database(format!("Failed to fetch reservations: {}", e))
        })?;

        debug!("Loaded {} active reservations for villa {}", rows.len(), villa_id);

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn list_filtered(
        &self,
        status: Option<BookingStatus>,
        villa_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Booking>, i64)> {
        debug!(
            "Listing bookings with filters: status={:?}, villa={:?}, limit={}, offset={}",
            status, villa_id, limit, offset
        );

        let status = status.map(|s| s.to_string());

        let total: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR villa_id = $2)
            "#,
        )
        .bind(&status)
        .bind(villa_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error counting filtered bookings: {}", e);
            AppError::Database(format!("Failed to count bookings: {}", e))
        })?;

        let query = format!(
            r#"
            SELECT {} FROM bookings
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR villa_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
            BOOKING_COLUMNS
        );
        let rows = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .bind(&status)
            .bind(villa_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error fetching filtered bookings: {}", e);
                AppError::Database(format!("Failed to fetch bookings: {}", e))
            })?;

        Ok((rows.into_iter().map(Into::into).collect(), total.0))
    }

    #[instrument(skip(self))]
    async fn find_created_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        status: Option<BookingStatus>,
        limit: i64,
    ) -> AppResult<Vec<Booking>> {
        let query = format!(
            r#"
            SELECT {} FROM bookings
            WHERE created_at >= $1::date
              AND created_at < ($2::date + 1)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY created_at DESC
            LIMIT $4
            "#,
            BOOKING_COLUMNS
        );
        let rows = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .bind(from)
            .bind(to)
            .bind(status.map(|s| s.to_string()))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error fetching bookings {} to {}: {}", from, to, e);
                AppError::Database(format!("Failed to fetch bookings: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn transition_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> AppResult<Option<Booking>> {
        debug!("Moving booking {} from {} to {}", id, from, to);

        let query = format!(
            r#"
            UPDATE bookings
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        );
        let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .bind(id)
            .bind(from.to_string())
            .bind(to.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error updating booking {} status: {}", id, e);
                AppError::Database(format!("Failed to update booking status: {}", e))
            })?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn confirm_pending(
        &self,
        id: Uuid,
        promo_id: Option<Uuid>,
    ) -> AppResult<ConfirmOutcome> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start transaction: {}", e);
            AppError::Transaction(format!("Failed to start transaction: {}", e))
        })?;

        // Lock the villa so confirmations for it run one at a time
        let villa: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT v.id
            FROM villas v
            JOIN bookings b ON b.villa_id = v.id
            WHERE b.id = $1
            FOR UPDATE OF v
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to lock villa for booking {}: {}", id, e);
            AppError::Database(format!("Failed to lock villa: {}", e))
        })?;

        if villa.is_none() {
            return Ok(ConfirmOutcome::NotPending);
        }

        let query = format!(
            r#"
            UPDATE bookings b
            SET status = 'confirmed', updated_at = NOW()
            WHERE b.id = $1
              AND b.status = 'pending'
              AND NOT EXISTS (
                  SELECT 1 FROM bookings o
                  WHERE o.villa_id = b.villa_id
                    AND o.status = 'confirmed'
                    AND o.id <> b.id
                    AND o.check_in < b.check_out
                    AND b.check_in < o.check_out
              )
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        );
        let confirmed = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                error!("Database error confirming booking {}: {}", id, e);
                AppError::Database(format!("Failed to confirm booking: {}", e))
            })?;

        let confirmed: Booking = match confirmed {
            Some(row) => row.into(),
            None => {
                let status: Option<(String,)> =
                    sqlx::query_as("SELECT status FROM bookings WHERE id = $1")
                        .bind(id)
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(|e| {
                            error!("Database error reading booking {} status: {}", id, e);
                            AppError::Database(format!("Failed to read booking status: {}", e))
                        })?;

                return Ok(match status.map(|(s,)| Self::parse_status(&s)) {
                    Some(BookingStatus::Pending) => ConfirmOutcome::Overlapping,
                    _ => ConfirmOutcome::NotPending,
                });
            }
        };

        if let Some(promo_id) = promo_id {
            let redeemed = sqlx::query(
                r#"
                UPDATE promos
                SET used_count = used_count + 1, updated_at = NOW()
                WHERE id = $1
                  AND (usage_limit IS NULL OR used_count < usage_limit)
                "#,
            )
            .bind(promo_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("Database error redeeming promo {}: {}", promo_id, e);
                AppError::Database(format!("Failed to update promo usage: {}", e))
            })?;

            // Returning drops the transaction, which rolls the status back
            if redeemed.rows_affected() != 1 {
                warn!("Promo {} exhausted, booking {} left pending", promo_id, id);
                return Ok(ConfirmOutcome::PromoExhausted);
            }
        }

        tx.commit().await.map_err(|e| {
            error!("Failed to commit transaction: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })?;

        debug!("Booking {} confirmed (promo {:?})", id, promo_id);

        Ok(ConfirmOutcome::Confirmed(confirmed))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    villa_id: Uuid,
    guest_name: String,
    guest_email: String,
    guest_phone: Option<String>,
    check_in: NaiveDate,
    check_out: NaiveDate,
    total_guests: i32,
    total_price: Decimal,
    status: String,
    special_requests: Option<String>,
    promo_code: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            villa_id: row.villa_id,
            guest_name: row.guest_name,
            guest_email: row.guest_email,
            guest_phone: row.guest_phone,
            check_in: row.check_in,
            check_out: row.check_out,
            total_guests: row.total_guests,
            total_price: row.total_price,
            status: PgBookingRepository::parse_status(&row.status),
            special_requests: row.special_requests,
            promo_code: row.promo_code,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReservationRow {
    check_in: NaiveDate,
    check_out: NaiveDate,
    status: String,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Reservation::new(
            row.check_in,
            row.check_out,
            PgBookingRepository::parse_status(&row.status),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(PgBookingRepository::parse_status("confirmed"), BookingStatus::Confirmed);
        assert_eq!(PgBookingRepository::parse_status("CANCELLED"), BookingStatus::Cancelled);
        assert_eq!(PgBookingRepository::parse_status("on_hold"), BookingStatus::Pending);
    }

    #[test]
    fn test_reservation_row_conversion() {
        let reservation: Reservation = ReservationRow {
            check_in: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(),
            status: "confirmed".to_string(),
        }
        .into();

        assert_eq!(reservation.status, BookingStatus::Confirmed);
        assert_eq!(reservation.stay().nights(), 3);
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn test_transition_is_conditional() {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/stayinubud".to_string());
        let pool = PgPool::connect(&url).await.unwrap();
        let repo = PgBookingRepository::new(pool);

        let (pending, _) = repo
            .list_filtered(Some(BookingStatus::Pending), None, 1, 0)
            .await
            .unwrap();

        if let Some(booking) = pending.first() {
            let moved = repo
                .transition_status(booking.id, BookingStatus::Confirmed, BookingStatus::Cancelled)
                .await
                .unwrap();
            assert!(moved.is_none());
        }
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn test_confirm_pending_is_noop_for_confirmed_booking() {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/stayinubud".to_string());
        let pool = PgPool::connect(&url).await.unwrap();
        let repo = PgBookingRepository::new(pool);

        let (confirmed, _) = repo
            .list_filtered(Some(BookingStatus::Confirmed), None, 1, 0)
            .await
            .unwrap();

        if let Some(booking) = confirmed.first() {
            let outcome = repo.confirm_pending(booking.id, None).await.unwrap();
            assert!(matches!(outcome, ConfirmOutcome::NotPending));
        }
    }
}
