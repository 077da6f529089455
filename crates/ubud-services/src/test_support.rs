//! In-memory repositories for service tests

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use parking_lot::Mutex;
use rust_decimal_macros::dec;
use std::sync::Arc;
use ubud_core::{
    models::{
        ActivityLog, ActivityLogData, Booking, BookingStatus, ConfirmOutcome, DiscountType, Promo,
        Reservation, Villa,
    },
    traits::{ActivityLogRepository, BookingRepository, PromoRepository, Repository, VillaRepository},
    AppError,
};
use uuid::Uuid;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn sample_villa() -> Villa {
    Villa {
        id: Uuid::from_u128(0x5a7a_0001),
        name: "Villa Sawah".to_string(),
        location: "Tegallalang, Ubud".to_string(),
        bedrooms: 2,
        bathrooms: 2,
        max_guests: 4,
        price_per_night: dec!(1000000),
        ..Default::default()
    }
}

pub fn booking_for(
    villa_id: Uuid,
    check_in: NaiveDate,
    check_out: NaiveDate,
    status: BookingStatus,
) -> Booking {
    let created_at = Utc.from_utc_datetime(&check_in.and_hms_opt(9, 0, 0).unwrap());
    Booking {
        villa_id,
        guest_name: "Made Wirawan".to_string(),
        guest_email: "made@example.com".to_string(),
        check_in,
        check_out,
        total_guests: 2,
        total_price: dec!(1000000) * rust_decimal::Decimal::from((check_out - check_in).num_days()),
        status,
        created_at,
        updated_at: created_at,
        ..Default::default()
    }
}

pub fn ubud10_promo() -> Promo {
    Promo {
        code: "UBUD10".to_string(),
        name: "Ubud 10".to_string(),
        discount_type: DiscountType::Percentage,
        discount_value: dec!(10),
        min_stay_nights: 2,
        valid_from: date(2024, 1, 1),
        valid_until: Some(date(2024, 12, 31)),
        is_active: true,
        ..Default::default()
    }
}

fn page<T: Clone>(items: &[T], limit: i64, offset: i64) -> Vec<T> {
    items
        .iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

pub struct MockVillas {
    villas: Vec<Villa>,
}

impl MockVillas {
    pub fn new(villas: Vec<Villa>) -> Self {
        Self { villas }
    }
}

#[async_trait]
impl Repository<Villa, Uuid> for MockVillas {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Villa>, AppError> {
        Ok(self.villas.iter().find(|v| v.id == id).cloned())
    }

    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<Villa>, AppError> {
        Ok(page(&self.villas, limit, offset))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.villas.len() as i64)
    }
}

#[async_trait]
impl VillaRepository for MockVillas {
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Villa>, AppError> {
        Ok(self
            .villas
            .iter()
            .filter(|v| ids.contains(&v.id))
            .cloned()
            .collect())
    }
}

pub struct MockBookings {
    bookings: Mutex<Vec<Booking>>,
    promos: Option<Arc<MockPromos>>,
    failing_confirms: Mutex<u32>,
    stale_reads: Mutex<bool>,
}

impl MockBookings {
    pub fn new(bookings: Vec<Booking>) -> Self {
        Self {
            bookings: Mutex::new(bookings),
            promos: None,
            failing_confirms: Mutex::new(0),
            stale_reads: Mutex::new(false),
        }
    }

    /// Redeem promos in this store when confirming
    pub fn with_promos(mut self, promos: Arc<MockPromos>) -> Self {
        self.promos = Some(promos);
        self
    }

    /// Make the next `n` confirmations fail as a dropped connection would
    pub fn fail_next_confirms(&self, n: u32) {
        *self.failing_confirms.lock() = n;
    }

    /// Serve reservation reads from before any confirmation happened,
    /// as another admin racing on the same villa would see them
    pub fn serve_stale_reservations(&self) {
        *self.stale_reads.lock() = true;
    }

    pub fn status_of(&self, id: Uuid) -> Option<BookingStatus> {
        self.bookings.lock().iter().find(|b| b.id == id).map(|b| b.status)
    }
}

#[async_trait]
impl Repository<Booking, Uuid> for MockBookings {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        Ok(self.bookings.lock().iter().find(|b| b.id == id).cloned())
    }

    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<Booking>, AppError> {
        Ok(page(&self.bookings.lock(), limit, offset))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.bookings.lock().len() as i64)
    }
}

#[async_trait]
impl BookingRepository for MockBookings {
    async fn find_active_reservations(
        &self,
        villa_id: Uuid,
        exclude: Option<Uuid>,
    ) -> Result<Vec<Reservation>, AppError> {
        if *self.stale_reads.lock() {
            return Ok(Vec::new());
        }

        Ok(self
            .bookings
            .lock()
            .iter()
            .filter(|b| b.villa_id == villa_id && Some(b.id) != exclude)
            .filter(|b| b.status.occupies_calendar())
            .map(Booking::reservation)
            .collect())
    }

    async fn list_filtered(
        &self,
        status: Option<BookingStatus>,
        villa_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Booking>, i64), AppError> {
        let matching: Vec<Booking> = self
            .bookings
            .lock()
            .iter()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .filter(|b| villa_id.map_or(true, |v| b.villa_id == v))
            .cloned()
            .collect();

        Ok((page(&matching, limit, offset), matching.len() as i64))
    }

    async fn find_created_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        status: Option<BookingStatus>,
        limit: i64,
    ) -> Result<Vec<Booking>, AppError> {
        let mut matching: Vec<Booking> = self
            .bookings
            .lock()
            .iter()
            .filter(|b| {
                let day = b.created_at.date_naive();
                day >= from && day <= to
            })
            .filter(|b| status.map_or(true, |s| b.status == s))
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit.max(0) as usize);
        Ok(matching)
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>, AppError> {
        let mut bookings = self.bookings.lock();
        match bookings.iter_mut().find(|b| b.id == id && b.status == from) {
            Some(booking) => {
                booking.status = to;
                booking.updated_at = Utc::now();
                Ok(Some(booking.clone()))
            }
            None => Ok(None),
        }
    }

    async fn confirm_pending(
        &self,
        id: Uuid,
        promo_id: Option<Uuid>,
    ) -> Result<ConfirmOutcome, AppError> {
        {
            let mut failing = self.failing_confirms.lock();
            if *failing > 0 {
                *failing -= 1;
                return Err(AppError::Database("connection reset".to_string()));
            }
        }

        let mut bookings = self.bookings.lock();
        let target = match bookings.iter().find(|b| b.id == id) {
            Some(b) if b.status == BookingStatus::Pending => b.clone(),
            _ => return Ok(ConfirmOutcome::NotPending),
        };

        let stay = target.reservation().stay();
        let overlapping = bookings.iter().any(|b| {
            b.id != id
                && b.villa_id == target.villa_id
                && b.status == BookingStatus::Confirmed
                && b.reservation().stay().overlaps(&stay)
        });
        if overlapping {
            return Ok(ConfirmOutcome::Overlapping);
        }

        if let Some(promo_id) = promo_id {
            let redeemed = self
                .promos
                .as_ref()
                .map_or(false, |promos| promos.redeem(promo_id));
            if !redeemed {
                return Ok(ConfirmOutcome::PromoExhausted);
            }
        }

        let booking = bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::BookingNotFound(id.to_string()))?;
        booking.status = BookingStatus::Confirmed;
        booking.updated_at = Utc::now();
        Ok(ConfirmOutcome::Confirmed(booking.clone()))
    }
}

pub struct MockPromos {
    promos: Mutex<Vec<Promo>>,
}

impl MockPromos {
    pub fn new(promos: Vec<Promo>) -> Self {
        Self {
            promos: Mutex::new(promos),
        }
    }

    /// Add one redemption within the usage limit
    pub fn redeem(&self, id: Uuid) -> bool {
        let mut promos = self.promos.lock();
        match promos.iter_mut().find(|p| p.id == id) {
            Some(promo) if promo.usage_limit.map_or(true, |limit| promo.used_count < limit) => {
                promo.used_count += 1;
                true
            }
            _ => false,
        }
    }

    pub fn used_count(&self, code: &str) -> Option<i32> {
        self.promos
            .lock()
            .iter()
            .find(|p| p.matches_code(code))
            .map(|p| p.used_count)
    }
}

#[async_trait]
impl Repository<Promo, Uuid> for MockPromos {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Promo>, AppError> {
        Ok(self.promos.lock().iter().find(|p| p.id == id).cloned())
    }

    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<Promo>, AppError> {
        Ok(page(&self.promos.lock(), limit, offset))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.promos.lock().len() as i64)
    }
}

#[async_trait]
impl PromoRepository for MockPromos {
    async fn find_by_code(&self, code: &str) -> Result<Option<Promo>, AppError> {
        Ok(self.promos.lock().iter().find(|p| p.matches_code(code)).cloned())
    }
}

#[derive(Default)]
pub struct MockActivity {
    entries: Mutex<Vec<ActivityLogData>>,
    logs: Mutex<Vec<ActivityLog>>,
    failing: Mutex<bool>,
}

impl MockActivity {
    pub fn entries(&self) -> Vec<ActivityLogData> {
        self.entries.lock().clone()
    }

    pub fn fail_writes(&self) {
        *self.failing.lock() = true;
    }
}

#[async_trait]
impl ActivityLogRepository for MockActivity {
    async fn create(&self, data: ActivityLogData) -> Result<ActivityLog, AppError> {
        if *self.failing.lock() {
            return Err(AppError::Database("activity_logs is read-only".to_string()));
        }

        let entry = ActivityLog {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            user_email: data.user_email.clone(),
            action: data.action.clone(),
            entity_type: data.entity_type.clone(),
            entity_id: data.entity_id.clone(),
            entity_name: data.entity_name.clone(),
            details: data.details.clone(),
            ip_address: data.ip_address.clone(),
            user_agent: data.user_agent.clone(),
            created_at: Utc::now(),
        };
        self.entries.lock().push(data);
        self.logs.lock().push(entry.clone());
        Ok(entry)
    }

    async fn list_filtered(
        &self,
        action: Option<&str>,
        entity_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ActivityLog>, i64), AppError> {
        let matching: Vec<ActivityLog> = self
            .logs
            .lock()
            .iter()
            .rev()
            .filter(|l| action.map_or(true, |a| l.action == a))
            .filter(|l| entity_type.map_or(true, |t| l.entity_type.as_deref() == Some(t)))
            .cloned()
            .collect();

        Ok((page(&matching, limit, offset), matching.len() as i64))
    }
}
