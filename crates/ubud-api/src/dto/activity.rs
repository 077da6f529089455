//! Activity log DTOs

use serde::Deserialize;

/// Filters for the admin activity log
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityFilterParams {
    pub action: Option<String>,
    pub entity_type: Option<String>,
}

impl ActivityFilterParams {
    /// Action filter; empty or `all` means every action
    pub fn action(&self) -> Option<&str> {
        Self::filter(self.action.as_deref())
    }

    /// Entity type filter; empty or `all` means every type
    pub fn entity_type(&self) -> Option<&str> {
        Self::filter(self.entity_type.as_deref())
    }

    fn filter(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|v| !v.is_empty() && *v != "all")
    }
}
