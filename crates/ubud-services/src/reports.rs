//! Admin reports
//!
//! CSV exports of bookings, villas and confirmed revenue, plus the summary
//! figures shown on the reports dashboard. Data cells are always quoted so
//! guest names and notes containing commas or quotes survive a spreadsheet
//! round trip.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument};
use ubud_core::{
    models::{Booking, BookingStatus, Villa},
    traits::{BookingRepository, VillaRepository},
    AppError, AppResult,
};
use uuid::Uuid;

use crate::constants::{DEFAULT_EXPORT_ROW_LIMIT, EMPTY_CELL, TOP_VILLAS};

const UNKNOWN_VILLA: &str = "Unknown";

/// Export type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    #[default]
    Bookings,
    Villas,
    /// Confirmed bookings only
    Revenue,
}

impl ReportKind {
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            ReportKind::Bookings => &[
                "ID",
                "Villa",
                "Guest Name",
                "Email",
                "Phone",
                "Check In",
                "Check Out",
                "Guests",
                "Total Price",
                "Status",
                "Created At",
            ],
            ReportKind::Villas => &[
                "ID",
                "Name",
                "Location",
                "Bedrooms",
                "Bathrooms",
                "Max Guests",
                "Price/Night",
                "Created At",
            ],
            ReportKind::Revenue => &["Date", "Booking ID", "Villa", "Guest", "Revenue"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Bookings => "bookings",
            ReportKind::Villas => "villas",
            ReportKind::Revenue => "revenue",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bookings" => Some(ReportKind::Bookings),
            "villas" => Some(ReportKind::Villas),
            "revenue" => Some(ReportKind::Revenue),
            _ => None,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quote one CSV cell, doubling embedded quotes
pub fn csv_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Assemble a CSV document
///
/// The header row is written bare; every data cell is quoted. Rows are
/// separated by `\n` with no trailing newline.
pub fn build_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.join(","));

    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| csv_cell(c)).collect();
        lines.push(cells.join(","));
    }

    lines.join("\n")
}

fn or_empty(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => EMPTY_CELL.to_string(),
    }
}

fn villa_name(names: &HashMap<Uuid, String>, villa_id: Uuid) -> String {
    or_empty(names.get(&villa_id).map(String::as_str))
}

/// One row per booking
pub fn booking_rows(bookings: &[Booking], villa_names: &HashMap<Uuid, String>) -> Vec<Vec<String>> {
    bookings
        .iter()
        .map(|b| {
            vec![
                b.id.to_string(),
                villa_name(villa_names, b.villa_id),
                b.guest_name.clone(),
                b.guest_email.clone(),
                or_empty(b.guest_phone.as_deref()),
                b.check_in.to_string(),
                b.check_out.to_string(),
                b.total_guests.to_string(),
                b.total_price.to_string(),
                b.status.to_string(),
                b.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect()
}

/// One row per villa
pub fn villa_rows(villas: &[Villa]) -> Vec<Vec<String>> {
    villas
        .iter()
        .map(|v| {
            vec![
                v.id.to_string(),
                v.name.clone(),
                or_empty(Some(v.location.as_str())),
                v.bedrooms.to_string(),
                v.bathrooms.to_string(),
                v.max_guests.to_string(),
                v.price_per_night.to_string(),
                v.created_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect()
}

/// One row per confirmed booking; other statuses are skipped
pub fn revenue_rows(bookings: &[Booking], villa_names: &HashMap<Uuid, String>) -> Vec<Vec<String>> {
    bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Confirmed)
        .map(|b| {
            vec![
                b.created_at.format("%Y-%m-%d").to_string(),
                b.id.to_string(),
                villa_name(villa_names, b.villa_id),
                b.guest_name.clone(),
                b.total_price.to_string(),
            ]
        })
        .collect()
}

/// Download name for an export
///
/// Booking and revenue exports carry their date window; the villa list is
/// stamped with the day it was taken.
pub fn export_filename(kind: ReportKind, from: NaiveDate, to: NaiveDate, today: NaiveDate) -> String {
    match kind {
        ReportKind::Villas => format!("villas_{}.csv", today),
        _ => format!("{}_{}_{}.csv", kind, from, to),
    }
}

/// A rendered CSV export
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub kind: ReportKind,
    pub filename: String,
    pub content: String,
    pub rows: usize,
}

/// Bookings per status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: BookingStatus,
    pub count: i64,
}

/// Revenue earned by one villa
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VillaRevenue {
    pub villa_id: Uuid,
    pub name: String,
    pub bookings: i64,
    pub revenue: Decimal,
}

/// Figures for the reports dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportStats {
    pub total_bookings: i64,
    pub total_revenue: Decimal,
    pub total_villas: i64,
    pub total_guests: i64,
    pub bookings_by_status: Vec<StatusCount>,
    /// Highest revenue first
    pub top_villas: Vec<VillaRevenue>,
}

/// Summarize the bookings of a reporting window
///
/// Revenue sums `total_price` over every booking in the window regardless of
/// status, as the dashboard shows gross booking value. `top` bounds the
/// villa table; ties in revenue are broken by name.
pub fn summarize(
    bookings: &[Booking],
    villa_names: &HashMap<Uuid, String>,
    villa_count: i64,
    top: usize,
) -> ReportStats {
    let mut by_status: HashMap<BookingStatus, i64> = HashMap::new();
    let mut by_villa: HashMap<Uuid, VillaRevenue> = HashMap::new();
    let mut total_revenue = Decimal::ZERO;
    let mut total_guests = 0i64;

    for booking in bookings {
        total_revenue += booking.total_price;
        total_guests += i64::from(booking.total_guests);
        *by_status.entry(booking.status).or_insert(0) += 1;

        let entry = by_villa.entry(booking.villa_id).or_insert_with(|| VillaRevenue {
            villa_id: booking.villa_id,
            name: villa_names
                .get(&booking.villa_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_VILLA.to_string()),
            bookings: 0,
            revenue: Decimal::ZERO,
        });
        entry.bookings += 1;
        entry.revenue += booking.total_price;
    }

    let bookings_by_status = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
    ]
    .into_iter()
    .filter_map(|status| {
        by_status
            .get(&status)
            .map(|&count| StatusCount { status, count })
    })
    .collect();

    let mut top_villas: Vec<VillaRevenue> = by_villa.into_values().collect();
    top_villas.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
    top_villas.truncate(top);

    ReportStats {
        total_bookings: bookings.len() as i64,
        total_revenue,
        total_villas: villa_count,
        total_guests,
        bookings_by_status,
        top_villas,
    }
}

/// Report service
pub struct ReportService<V, B>
where
    V: VillaRepository,
    B: BookingRepository,
{
    villas: Arc<V>,
    bookings: Arc<B>,
    row_limit: i64,
    top_villas: usize,
}

impl<V, B> ReportService<V, B>
where
    V: VillaRepository,
    B: BookingRepository,
{
    pub fn new(villas: Arc<V>, bookings: Arc<B>) -> Self {
        Self {
            villas,
            bookings,
            row_limit: DEFAULT_EXPORT_ROW_LIMIT,
            top_villas: TOP_VILLAS,
        }
    }

    /// Cap the number of rows fetched per report
    pub fn with_row_limit(mut self, limit: i64) -> Self {
        self.row_limit = limit.max(1);
        self
    }

    /// Size of the top-villas table
    pub fn with_top_villas(mut self, top: usize) -> Self {
        self.top_villas = top;
        self
    }

    fn check_window(from: NaiveDate, to: NaiveDate) -> AppResult<()> {
        if from > to {
            return Err(AppError::InvalidRange(format!(
                "report window starts {} after it ends {}",
                from, to
            )));
        }
        Ok(())
    }

    async fn villa_names(&self, bookings: &[Booking]) -> AppResult<HashMap<Uuid, String>> {
        let mut ids: Vec<Uuid> = bookings.iter().map(|b| b.villa_id).collect();
        ids.sort_unstable();
        ids.dedup();

        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        Ok(self
            .villas
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|v| (v.id, v.name))
            .collect())
    }

    /// Render a CSV export
    ///
    /// `from` and `to` bound the booking creation day, both inclusive. The
    /// villa export ignores them.
    #[instrument(skip(self))]
    pub async fn export(
        &self,
        kind: ReportKind,
        from: NaiveDate,
        to: NaiveDate,
        today: NaiveDate,
    ) -> AppResult<CsvExport> {
        Self::check_window(from, to)?;

        let rows = match kind {
            ReportKind::Bookings => {
                let bookings = self
                    .bookings
                    .find_created_between(from, to, None, self.row_limit)
                    .await?;
                let names = self.villa_names(&bookings).await?;
                booking_rows(&bookings, &names)
            }
            ReportKind::Revenue => {
                let bookings = self
                    .bookings
                    .find_created_between(from, to, Some(BookingStatus::Confirmed), self.row_limit)
                    .await?;
                let names = self.villa_names(&bookings).await?;
                revenue_rows(&bookings, &names)
            }
            ReportKind::Villas => {
                let mut villas = self.villas.find_all(self.row_limit, 0).await?;
                villas.sort_by(|a, b| a.name.cmp(&b.name));
                villa_rows(&villas)
            }
        };

        let export = CsvExport {
            kind,
            filename: export_filename(kind, from, to, today),
            content: build_csv(kind.headers(), &rows),
            rows: rows.len(),
        };

        info!("Exported {} report: {} rows as {}", kind, export.rows, export.filename);

        Ok(export)
    }

    /// Dashboard figures for bookings created within `[from, to]`
    #[instrument(skip(self))]
    pub async fn stats(&self, from: NaiveDate, to: NaiveDate) -> AppResult<ReportStats> {
        Self::check_window(from, to)?;

        let bookings = self
            .bookings
            .find_created_between(from, to, None, self.row_limit)
            .await?;
        let names = self.villa_names(&bookings).await?;
        let villa_count = self.villas.count().await?;

        Ok(summarize(&bookings, &names, villa_count, self.top_villas))
    }
}
