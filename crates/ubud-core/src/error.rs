//! Unified error handling for StayinUBUD
//!
//! This module provides a comprehensive error type that covers all possible
//! failure scenarios in the application, with automatic HTTP response mapping.
//!
//! Promo ineligibility is deliberately absent: it is reported through
//! `PricingResult::reason`, never as an error.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Main application error type
///
/// All errors in the application should be converted to this type.
/// It implements `ResponseError` for automatic HTTP response generation.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Database Errors ====================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database pool error: {0}")]
    Pool(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    // ==================== Date Errors ====================
    /// Candidate check-in is not strictly before check-out
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    /// Unparsable or out-of-range calendar date
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    // ==================== Business Logic Errors ====================
    #[error("Villa not found: {0}")]
    VillaNotFound(String),

    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    #[error("Promo not found: {0}")]
    PromoNotFound(String),

    #[error("Villa not available for {check_in} to {check_out}")]
    VillaUnavailable { check_in: String, check_out: String },

    #[error("Promo usage limit exhausted: {0}")]
    PromoUsageExhausted(String),

    // ==================== Validation Errors ====================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ==================== Resource Errors ====================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // ==================== Internal Errors ====================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation(_)
            | AppError::InvalidInput(_)
            | AppError::InvalidRange(_)
            | AppError::InvalidDate(_) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            AppError::VillaNotFound(_)
            | AppError::BookingNotFound(_)
            | AppError::PromoNotFound(_)
            | AppError::NotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::Conflict(_)
            | AppError::VillaUnavailable { .. }
            | AppError::PromoUsageExhausted(_) => StatusCode::CONFLICT,

            // 500 Internal Server Error
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::Pool(_) => "pool_error",
            AppError::Transaction(_) => "transaction_error",
            AppError::InvalidRange(_) => "invalid_range",
            AppError::InvalidDate(_) => "invalid_date",
            AppError::VillaNotFound(_) => "villa_not_found",
            AppError::BookingNotFound(_) => "booking_not_found",
            AppError::PromoNotFound(_) => "promo_not_found",
            AppError::VillaUnavailable { .. } => "villa_unavailable",
            AppError::PromoUsageExhausted(_) => "promo_usage_exhausted",
            AppError::Validation(_) => "validation_error",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = json!({
            "error": self.error_code(),
            "message": self.to_string(),
            "status": status.as_u16(),
        });

        HttpResponse::build(status).json(body)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
