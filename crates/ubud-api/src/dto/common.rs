//! Common DTOs used across the API

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use ubud_core::{
    dates,
    traits::{PaginatedResponse, Pagination, PaginationMeta},
    AppResult,
};
use validator::Validate;

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            data,
            message: None,
        }
    }

    /// Create a success response with data and message
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: Some(message.into()),
        }
    }
}

/// Pagination query parameters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page", deserialize_with = "deserialize_number_from_string")]
    #[validate(range(min = 1))]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_per_page", deserialize_with = "deserialize_number_from_string")]
    #[validate(range(min = 1, max = 1000))]
    pub per_page: i64,
}

/// Deserialize a number from either a string or a number
fn deserialize_number_from_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct I64OrStringVisitor;

    impl<'de> Visitor<'de> for I64OrStringVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<i64, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<i64, E>
        where
            E: de::Error,
        {
            i64::try_from(value).map_err(de::Error::custom)
        }

        fn visit_str<E>(self, value: &str) -> Result<i64, E>
        where
            E: de::Error,
        {
            value.parse::<i64>().map_err(de::Error::custom)
        }
    }

    deserializer.deserialize_any(I64OrStringVisitor)
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    50
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationParams {
    /// Repository pagination for these parameters
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }

    /// Create pagination metadata
    pub fn metadata(&self, total: i64) -> PaginationMeta {
        PaginationMeta::new(total, self.page, self.per_page)
    }

    /// Create paginated response
    pub fn paginate<T>(&self, data: Vec<T>, total: i64) -> PaginatedResponse<T> {
        PaginatedResponse {
            data,
            pagination: self.metadata(total),
        }
    }
}

/// Days covered by a report window when no start is given
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Optional `from`/`to` dates as sent by the admin reports page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateWindowParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl DateWindowParams {
    /// Resolve to concrete days
    ///
    /// A missing `to` means today; a missing `from` means 30 days before `to`.
    pub fn resolve(&self, today: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
        let to = match self.to.as_deref() {
            Some(s) => dates::parse_date(s)?,
            None => today,
        };
        let from = match self.from.as_deref() {
            Some(s) => dates::parse_date(s)?,
            None => to - Duration::days(DEFAULT_WINDOW_DAYS),
        };
        Ok((from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ubud_core::AppError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_pagination_params() {
        let params = PaginationParams {
            page: 3,
            per_page: 20,
        };
        let pagination = params.pagination();
        assert_eq!(pagination.offset(), 40);
        assert_eq!(pagination.limit(), 20);
        assert_eq!(params.metadata(45).total_pages, 3);
    }

    #[test]
    fn test_pagination_from_query_strings() {
        let params: PaginationParams =
            serde_json::from_value(serde_json::json!({ "page": "2", "per_page": 25 })).unwrap();
        assert_eq!(params.page, 2);
        assert_eq!(params.per_page, 25);
        assert!(params.validate().is_ok());

        let params = PaginationParams {
            page: 0,
            per_page: 5000,
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_date_window_defaults() {
        let today = date(2024, 6, 30);
        let (from, to) = DateWindowParams::default().resolve(today).unwrap();
        assert_eq!(to, today);
        assert_eq!(from, date(2024, 5, 31));

        let explicit = DateWindowParams {
            from: Some("2024-01-01".to_string()),
            to: Some("2024-01-31T23:59:59Z".to_string()),
        };
        assert_eq!(explicit.resolve(today).unwrap(), (date(2024, 1, 1), date(2024, 1, 31)));
    }

    #[test]
    fn test_date_window_rejects_garbage() {
        let params = DateWindowParams {
            from: Some("yesterday".to_string()),
            to: None,
        };
        assert!(matches!(
            params.resolve(date(2024, 6, 30)),
            Err(AppError::InvalidDate(_))
        ));
    }
}
