//! Common traits for repositories
//!
//! The engines never touch storage; these traits are the seam between the
//! booking services and whatever store holds villas, bookings and promos.

use crate::error::AppError;
use crate::models::{
    ActivityLog, ActivityLogData, Booking, BookingStatus, ConfirmOutcome, Promo, Reservation,
    Villa,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// Generic read access shared by all repositories
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, AppError>;

    /// Find all entities with pagination
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<T>, AppError>;

    /// Count total entities
    async fn count(&self) -> Result<i64, AppError>;
}

/// Villa repository
#[async_trait]
pub trait VillaRepository: Repository<Villa, Uuid> {
    /// Find villas by id, in no particular order
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Villa>, AppError>;
}

/// Booking repository trait with specialized methods
#[async_trait]
pub trait BookingRepository: Repository<Booking, Uuid> {
    /// Calendar-blocking reservations (pending or confirmed) for a villa
    ///
    /// `exclude` leaves one booking out, so a booking is never checked
    /// against itself.
    async fn find_active_reservations(
        &self,
        villa_id: Uuid,
        exclude: Option<Uuid>,
    ) -> Result<Vec<Reservation>, AppError>;

    /// List bookings with filtering, newest first
    async fn list_filtered(
        &self,
        status: Option<BookingStatus>,
        villa_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Booking>, i64), AppError>;

    /// Bookings created between two days (inclusive), newest first
    async fn find_created_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        status: Option<BookingStatus>,
        limit: i64,
    ) -> Result<Vec<Booking>, AppError>;

    /// Move a booking from one status to another
    ///
    /// Returns `None` when the booking was not in `from`, so concurrent or
    /// repeated calls change it at most once.
    async fn transition_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>, AppError>;

    /// Confirm a pending booking and redeem its promo as one atomic step
    ///
    /// Confirmations for the same villa are serialized, the booking must not
    /// overlap another confirmed stay, and `promo_id` (when given) gains one
    /// redemption within its usage limit. Any other outcome, or an error,
    /// leaves both the booking and the promo untouched.
    async fn confirm_pending(
        &self,
        id: Uuid,
        promo_id: Option<Uuid>,
    ) -> Result<ConfirmOutcome, AppError>;
}

/// Promo repository trait with specialized methods
#[async_trait]
pub trait PromoRepository: Repository<Promo, Uuid> {
    /// Find promo by code, case-insensitively
    async fn find_by_code(&self, code: &str) -> Result<Option<Promo>, AppError>;
}

/// Activity log repository
#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    /// Store a new entry
    async fn create(&self, data: ActivityLogData) -> Result<ActivityLog, AppError>;

    /// Entries matching the optional action and entity type, newest first,
    /// with the total match count
    async fn list_filtered(
        &self,
        action: Option<&str>,
        entity_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ActivityLog>, i64), AppError>;
}

/// Pagination parameters
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 1000),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }
}
