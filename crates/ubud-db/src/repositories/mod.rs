//! Repository implementations
//!
//! Concrete implementations of the repository traits defined in ubud-core,
//! using sqlx for PostgreSQL access.

pub mod activity_repo;
pub mod booking_repo;
pub mod promo_repo;
pub mod villa_repo;

pub use activity_repo::PgActivityLogRepository;
pub use booking_repo::PgBookingRepository;
pub use promo_repo::PgPromoRepository;
pub use villa_repo::PgVillaRepository;
