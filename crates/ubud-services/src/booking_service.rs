//! Booking service
//!
//! Fetches reservation and promo snapshots through the repositories, runs the
//! engines on them, and applies the few mutations the back-office needs:
//! - Availability checks and month calendars for a villa
//! - Price quotes with an optional promo code
//! - Confirming a pending booking, redeeming its promo exactly once
//! - Cancelling a booking
//! - The admin promo list and activity log

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use ubud_core::{
    dates,
    models::{
        ActivityLog, Booking, BookingContext, BookingStatus, ConfirmOutcome, DayStatus,
        PricingResult, Promo, Reservation, StayRange, Villa,
    },
    traits::{ActivityLogRepository, BookingRepository, Pagination, PromoRepository, VillaRepository},
    AppError, AppResult,
};
use uuid::Uuid;

use crate::availability::{conflicting_reservations, day_status_for_month, is_range_available};
use crate::constants::DEFAULT_MAX_STAY_NIGHTS;
use crate::promo_pricing::{evaluate_promo, is_currently_valid};
use crate::quote::{quote_stay, StayQuote};

/// Result of an availability check
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResult {
    pub villa_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub available: bool,
    /// Active reservations the stay collides with
    pub conflicts: Vec<Reservation>,
}

/// Result of confirming a booking
#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    pub booking: Booking,
    /// False when the booking was already confirmed
    pub newly_confirmed: bool,
    /// True when this call added a redemption to the booking's promo
    pub promo_redeemed: bool,
}

/// A promo with its validity on the day it was listed
#[derive(Debug, Clone)]
pub struct PromoSummary {
    pub promo: Promo,
    pub currently_valid: bool,
}

/// One page of the admin promo list
#[derive(Debug, Clone)]
pub struct PromoListing {
    pub promos: Vec<PromoSummary>,
    /// Promos in the store
    pub total: i64,
    /// Promos valid today, across all pages
    pub active_now: usize,
}

/// Booking service
///
/// Generic over its repositories so it can run against PostgreSQL in
/// production and in-memory stores in tests.
pub struct BookingService<V, B, P, L>
where
    V: VillaRepository,
    B: BookingRepository,
    P: PromoRepository,
    L: ActivityLogRepository,
{
    villas: Arc<V>,
    bookings: Arc<B>,
    promos: Arc<P>,
    activity: Arc<L>,
    max_stay_nights: i64,
}

impl<V, B, P, L> BookingService<V, B, P, L>
where
    V: VillaRepository,
    B: BookingRepository,
    P: PromoRepository,
    L: ActivityLogRepository,
{
    /// Create a new booking service
    pub fn new(villas: Arc<V>, bookings: Arc<B>, promos: Arc<P>, activity: Arc<L>) -> Self {
        Self {
            villas,
            bookings,
            promos,
            activity,
            max_stay_nights: DEFAULT_MAX_STAY_NIGHTS,
        }
    }

    /// Override the longest stay that can be quoted
    pub fn with_max_stay_nights(mut self, nights: i64) -> Self {
        self.max_stay_nights = nights;
        self
    }

    async fn find_villa(&self, villa_id: Uuid) -> AppResult<Villa> {
        self.villas
            .find_by_id(villa_id)
            .await?
            .ok_or_else(|| AppError::VillaNotFound(villa_id.to_string()))
    }

    async fn find_booking(&self, booking_id: Uuid) -> AppResult<Booking> {
        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::BookingNotFound(booking_id.to_string()))
    }

    async fn find_promo(&self, code: &str) -> AppResult<Promo> {
        let normalized = Promo::normalize_code(code);
        self.promos
            .find_by_code(&normalized)
            .await?
            .ok_or(AppError::PromoNotFound(normalized))
    }

    /// Check whether a villa is free for `[check_in, check_out)`
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` before touching the store when the range is
    /// empty or reversed, and `VillaNotFound` for an unknown villa.
    #[instrument(skip(self))]
    pub async fn check_availability(
        &self,
        villa_id: Uuid,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> AppResult<AvailabilityResult> {
        let stay = StayRange::new(check_in, check_out)?;
        self.find_villa(villa_id).await?;

        let reservations = self
            .bookings
            .find_active_reservations(villa_id, None)
            .await?;
        let conflicts = conflicting_reservations(&reservations, check_in, check_out)?;

        debug!(
            "Villa {} {} checked against {} reservations: {} conflicts",
            villa_id,
            stay,
            reservations.len(),
            conflicts.len()
        );

        Ok(AvailabilityResult {
            villa_id,
            check_in,
            check_out,
            nights: stay.nights(),
            available: conflicts.is_empty(),
            conflicts,
        })
    }

    /// Day-by-day status of a villa for one month
    #[instrument(skip(self))]
    pub async fn month_calendar(
        &self,
        villa_id: Uuid,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> AppResult<Vec<DayStatus>> {
        dates::first_of_month(year, month)?;
        self.find_villa(villa_id).await?;

        let reservations = self
            .bookings
            .find_active_reservations(villa_id, None)
            .await?;

        day_status_for_month(&reservations, year, month, today)
    }

    /// Quote a stay, applying a promo code when one is given
    ///
    /// # Errors
    ///
    /// Returns `PromoNotFound` for an unknown code. A known but ineligible
    /// code is not an error; the quote carries the rejection reason.
    #[instrument(skip(self))]
    pub async fn quote(
        &self,
        villa_id: Uuid,
        check_in: NaiveDate,
        check_out: NaiveDate,
        promo_code: Option<&str>,
        today: NaiveDate,
    ) -> AppResult<StayQuote> {
        StayRange::new(check_in, check_out)?;
        let villa = self.find_villa(villa_id).await?;

        let promo = match promo_code.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => Some(self.find_promo(code).await?),
            None => None,
        };

        let quote = quote_stay(
            &villa,
            check_in,
            check_out,
            promo.as_ref(),
            today,
            self.max_stay_nights,
        )?;

        info!(
            "Quoted villa {} for {} nights: subtotal {}, total {}",
            villa.name, quote.nights, quote.subtotal, quote.total
        );

        Ok(quote)
    }

    /// Evaluate a promo code against a booking context
    #[instrument(skip(self))]
    pub async fn evaluate_code(
        &self,
        code: &str,
        ctx: BookingContext,
        today: NaiveDate,
    ) -> AppResult<(Promo, PricingResult)> {
        let promo = self.find_promo(code).await?;
        let result = evaluate_promo(&promo, &ctx, today);

        debug!(
            "Promo {} evaluated: eligible={}, reason={:?}",
            promo.code, result.eligible, result.reason
        );

        Ok((promo, result))
    }

    /// List bookings for the admin screen
    #[instrument(skip(self))]
    pub async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
        villa_id: Option<Uuid>,
        pagination: &Pagination,
    ) -> AppResult<(Vec<Booking>, i64)> {
        self.bookings
            .list_filtered(status, villa_id, pagination.limit(), pagination.offset())
            .await
    }

    /// List promos for the admin screen, flagging the ones valid today
    ///
    /// `active_now` counts currently valid promos across every page.
    #[instrument(skip(self))]
    pub async fn list_promos(
        &self,
        pagination: &Pagination,
        today: NaiveDate,
    ) -> AppResult<PromoListing> {
        let total = self.promos.count().await?;
        let all = self.promos.find_all(total.max(0), 0).await?;
        let active_now = all.iter().filter(|p| is_currently_valid(p, today)).count();

        let promos = all
            .into_iter()
            .skip(pagination.offset().max(0) as usize)
            .take(pagination.limit().max(0) as usize)
            .map(|promo| PromoSummary {
                currently_valid: is_currently_valid(&promo, today),
                promo,
            })
            .collect();

        Ok(PromoListing {
            promos,
            total,
            active_now,
        })
    }

    /// Admin activity log, newest first
    #[instrument(skip(self))]
    pub async fn list_activity(
        &self,
        action: Option<&str>,
        entity_type: Option<&str>,
        pagination: &Pagination,
    ) -> AppResult<(Vec<ActivityLog>, i64)> {
        self.activity
            .list_filtered(action, entity_type, pagination.limit(), pagination.offset())
            .await
    }

    /// Confirm a pending booking
    ///
    /// The booking is re-checked against the villa's other confirmed stays,
    /// then the status change and the promo redemption are handed to the
    /// store as one atomic step. The store repeats the overlap check under a
    /// per-villa lock, so racing confirmations cannot double book. A failed
    /// step leaves the booking pending and the promo uncounted, so a retry
    /// redeems it exactly once; confirming twice never counts twice.
    ///
    /// # Errors
    ///
    /// - `BookingNotFound` for an unknown booking
    /// - `Conflict` when the booking is cancelled
    /// - `VillaUnavailable` when another confirmed stay overlaps
    /// - `PromoUsageExhausted` when the promo has no redemptions left
    #[instrument(skip(self))]
    pub async fn confirm_booking(
        &self,
        booking_id: Uuid,
        actor_email: Option<&str>,
    ) -> AppResult<BookingConfirmation> {
        let booking = self.find_booking(booking_id).await?;

        match booking.status {
            BookingStatus::Confirmed => {
                debug!("Booking {} already confirmed", booking_id);
                return Ok(BookingConfirmation {
                    booking,
                    newly_confirmed: false,
                    promo_redeemed: false,
                });
            }
            BookingStatus::Cancelled => {
                return Err(AppError::Conflict(format!(
                    "Booking {} is cancelled and cannot be confirmed",
                    booking.reference()
                )));
            }
            BookingStatus::Pending => {}
        }

        // Competing pending requests do not block; only confirmed stays do
        let confirmed_stays: Vec<Reservation> = self
            .bookings
            .find_active_reservations(booking.villa_id, Some(booking.id))
            .await?
            .into_iter()
            .filter(|r| r.status == BookingStatus::Confirmed)
            .collect();

        if !is_range_available(&confirmed_stays, booking.check_in, booking.check_out)? {
            warn!(
                "Cannot confirm booking {}: villa {} already booked for {} to {}",
                booking_id, booking.villa_id, booking.check_in, booking.check_out
            );
            return Err(AppError::VillaUnavailable {
                check_in: booking.check_in.to_string(),
                check_out: booking.check_out.to_string(),
            });
        }

        let code = booking.promo_code.as_deref().map(str::trim).filter(|c| !c.is_empty());
        let promo = match code {
            Some(code) => {
                let promo = self.promos.find_by_code(code).await?;
                if promo.is_none() {
                    warn!(
                        "Promo {} on booking {} no longer exists, nothing to redeem",
                        code,
                        booking.reference()
                    );
                }
                promo
            }
            None => None,
        };

        let confirmed = match self
            .bookings
            .confirm_pending(booking_id, promo.as_ref().map(|p| p.id))
            .await?
        {
            ConfirmOutcome::Confirmed(updated) => updated,
            ConfirmOutcome::Overlapping => {
                warn!(
                    "Booking {} lost the villa to a concurrent confirmation",
                    booking_id
                );
                return Err(AppError::VillaUnavailable {
                    check_in: booking.check_in.to_string(),
                    check_out: booking.check_out.to_string(),
                });
            }
            ConfirmOutcome::PromoExhausted => {
                let code = promo.as_ref().map(|p| p.code.clone()).unwrap_or_default();
                warn!(
                    "Promo {} exhausted while confirming booking {}, left pending",
                    code,
                    booking.reference()
                );
                return Err(AppError::PromoUsageExhausted(code));
            }
            ConfirmOutcome::NotPending => {
                // Someone else moved it between our read and write
                let current = self.find_booking(booking_id).await?;
                if current.status == BookingStatus::Confirmed {
                    return Ok(BookingConfirmation {
                        booking: current,
                        newly_confirmed: false,
                        promo_redeemed: false,
                    });
                }
                return Err(AppError::Conflict(format!(
                    "Booking {} changed to {} while confirming",
                    current.reference(),
                    current.status
                )));
            }
        };

        let promo_redeemed = promo.is_some();

        info!(
            "Booking {} confirmed (promo redeemed: {})",
            confirmed.reference(),
            promo_redeemed
        );

        self.record_activity(
            actor_email,
            "update",
            &confirmed,
            json!({
                "status": BookingStatus::Confirmed,
                "check_in": confirmed.check_in,
                "check_out": confirmed.check_out,
                "promo_code": confirmed.promo_code,
                "promo_redeemed": promo_redeemed,
            }),
        )
        .await;

        Ok(BookingConfirmation {
            booking: confirmed,
            newly_confirmed: true,
            promo_redeemed,
        })
    }

    /// Cancel a booking
    ///
    /// Cancelling never touches the promo's redemption count. Cancelling a
    /// cancelled booking returns it unchanged.
    #[instrument(skip(self))]
    pub async fn cancel_booking(
        &self,
        booking_id: Uuid,
        actor_email: Option<&str>,
    ) -> AppResult<Booking> {
        let booking = self.find_booking(booking_id).await?;

        if booking.status == BookingStatus::Cancelled {
            return Ok(booking);
        }

        let cancelled = self
            .bookings
            .transition_status(booking_id, booking.status, BookingStatus::Cancelled)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!(
                    "Booking {} changed while cancelling",
                    booking.reference()
                ))
            })?;

        info!("Booking {} cancelled (was {})", cancelled.reference(), booking.status);

        self.record_activity(
            actor_email,
            "update",
            &cancelled,
            json!({
                "status": BookingStatus::Cancelled,
                "previous_status": booking.status,
            }),
        )
        .await;

        Ok(cancelled)
    }

    /// Write an activity entry; failures are logged and swallowed
    async fn record_activity(
        &self,
        actor_email: Option<&str>,
        action: &str,
        booking: &Booking,
        details: serde_json::Value,
    ) {
        let mut builder = ActivityLog::builder()
            .action(action)
            .entity_type("booking")
            .entity_id(booking.id.to_string())
            .entity_name(format!("{} {}", booking.reference(), booking.guest_name))
            .details(details);

        if let Some(email) = actor_email {
            builder = builder.user_email(email);
        }

        let data = match builder.build() {
            Ok(data) => data,
            Err(e) => {
                warn!("Skipping activity log for {}: {}", action, e);
                return;
            }
        };

        if let Err(e) = self.activity.create(data).await {
            warn!("Failed to write activity log for {}: {}", action, e);
        }
    }
}
