//! StayinUBUD Database Layer
//!
//! PostgreSQL access for the booking back-office:
//!
//! - Connection pool management with sqlx
//! - Repository implementations for villas, bookings, promos and the
//!   admin activity log
//! - Conditional updates for booking status changes and promo redemptions,
//!   so retries and concurrent admins never double count

pub mod pool;
pub mod repositories;

pub use pool::create_pool;
pub use repositories::*;

// Re-export commonly used types
pub use sqlx::PgPool;
pub use ubud_core::{AppError, AppResult};
