//! StayinUBUD Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the StayinUBUD booking back-office. It includes:
//!
//! - Domain models (Villa, Booking, Promo, calendar day status, activity log)
//! - Calendar-date helpers shared by the availability and pricing engines
//! - Repository traits implemented by the database layer
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod config;
pub mod dates;
pub mod error;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
