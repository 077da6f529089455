//! Admin activity log model
//!
//! Records who did what in the back-office (confirmations, cancellations,
//! exports) for the activity-log screen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Activity log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    /// Unique identifier
    pub id: Uuid,

    /// Acting admin (if known)
    pub user_id: Option<Uuid>,

    /// Acting admin's email, as supplied by the auth provider
    pub user_email: Option<String>,

    /// Action performed (e.g. "update", "export")
    pub action: String,

    /// Entity type affected (e.g. "booking", "promo")
    pub entity_type: Option<String>,

    pub entity_id: Option<String>,

    /// Human readable name of the entity
    pub entity_name: Option<String>,

    /// Additional details (JSON)
    pub details: Option<JsonValue>,

    pub ip_address: Option<String>,

    pub user_agent: Option<String>,

    /// Timestamp of the action
    pub created_at: DateTime<Utc>,
}

impl ActivityLog {
    /// Create a new activity log builder
    pub fn builder() -> ActivityLogBuilder {
        ActivityLogBuilder::default()
    }
}

/// Builder for creating activity log entries
#[derive(Debug, Default)]
pub struct ActivityLogBuilder {
    user_id: Option<Uuid>,
    user_email: Option<String>,
    action: Option<String>,
    entity_type: Option<String>,
    entity_id: Option<String>,
    entity_name: Option<String>,
    details: Option<JsonValue>,
    ip_address: Option<String>,
    user_agent: Option<String>,
}

impl ActivityLogBuilder {
    pub fn user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn user_email(mut self, email: impl Into<String>) -> Self {
        self.user_email = Some(email.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn entity_name(mut self, entity_name: impl Into<String>) -> Self {
        self.entity_name = Some(entity_name.into());
        self
    }

    pub fn details(mut self, details: JsonValue) -> Self {
        self.details = Some(details);
        self
    }

    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Build the entry data for insertion
    pub fn build(self) -> Result<ActivityLogData, &'static str> {
        Ok(ActivityLogData {
            user_id: self.user_id,
            user_email: self.user_email,
            action: self.action.ok_or("action is required")?,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            entity_name: self.entity_name,
            details: self.details,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
        })
    }
}

/// Data for creating an activity log entry
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityLogData {
    pub user_id: Option<Uuid>,
    pub user_email: Option<String>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub entity_name: Option<String>,
    pub details: Option<JsonValue>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
