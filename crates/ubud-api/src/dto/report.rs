//! Report DTOs

use serde::Deserialize;
use ubud_core::{AppError, AppResult};
use ubud_services::ReportKind;

use super::common::DateWindowParams;

/// CSV export parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportParams {
    /// `bookings` (default), `villas` or `revenue`
    pub kind: Option<String>,
    #[serde(flatten)]
    pub window: DateWindowParams,
}

impl ExportParams {
    pub fn kind(&self) -> AppResult<ReportKind> {
        match self.kind.as_deref() {
            None => Ok(ReportKind::default()),
            Some(s) => ReportKind::from_str(s.trim())
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown report type: {}", s))),
        }
    }
}
