//! Reservation engine
//!
//! Orchestrates a booking attempt: calendar validation, weather gate,
//! player-detail validation, exclusive allocation, persistence, and the
//! booking lifecycle state machine. Per booking attempt the states are
//! Requested → HeldSlot → AwaitingPayment → Confirmed, with fail-fast
//! exits before confirmation and a bounded hold timeout as the only wait
//! in the system.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::availability::{AvailabilityIndex, HoldToken};
use crate::config::EngineSettings;
use crate::domain::booking::{Booking, BookingRepository, BookingStatus, PlayerDetails};
use crate::domain::error::{BookingError, BookingResult};
use crate::domain::policy::{compute_refund, CancellationCause};
use crate::domain::ports::{
    Clock, FacilityDirectory, Notifier, PaymentGateway, PaymentOutcome, Playability, WeatherGate,
};
use crate::domain::slot::{find_slot, generate_slots, SlotKey, TimeSlot};
use crate::notifications::{
    BookingCancelledEvent, BookingCompletedEvent, BookingConfirmedEvent, BookingEvent,
    HoldExpiredEvent, WeatherVoidedEvent,
};
use crate::shared::retry::{retry_with_backoff, RetryConfig};

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long a held slot waits for payment before being released
    pub hold_timeout: Duration,
    /// Retry behavior for transient repository failures
    pub retry: RetryConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hold_timeout: Duration::from_secs(120),
            retry: RetryConfig::default(),
        }
    }
}

impl From<&EngineSettings> for EngineConfig {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            hold_timeout: Duration::from_secs(settings.hold_timeout_secs),
            retry: RetryConfig::default(),
        }
    }
}

/// A fully collected booking request. Multi-step client flows (date →
/// slot → details) are a client concern; the engine only ever sees this
/// single atomic call.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub facility_id: String,
    pub slot_start: DateTime<Utc>,
    /// Opaque authenticated-user identifier
    pub user_id: String,
    pub player: PlayerDetails,
}

/// One calendar slot annotated for display by the presentation layer.
#[derive(Debug, Clone)]
pub struct SlotView {
    pub slot: TimeSlot,
    pub available: bool,
    pub playability: Playability,
}

/// An unsettled hold: the slot key and the token proving ownership.
/// Exactly one of confirm / abandon / timeout removes the guard.
struct HoldGuard {
    key: SlotKey,
    token: HoldToken,
}

/// The reservation engine. Cheap to clone; all dependencies are shared.
#[derive(Clone)]
pub struct ReservationEngine {
    availability: Arc<AvailabilityIndex>,
    repo: Arc<dyn BookingRepository>,
    weather: Arc<dyn WeatherGate>,
    payments: Arc<dyn PaymentGateway>,
    facilities: Arc<dyn FacilityDirectory>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    holds: Arc<DashMap<Uuid, HoldGuard>>,
}

impl ReservationEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        availability: Arc<AvailabilityIndex>,
        repo: Arc<dyn BookingRepository>,
        weather: Arc<dyn WeatherGate>,
        payments: Arc<dyn PaymentGateway>,
        facilities: Arc<dyn FacilityDirectory>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            availability,
            repo,
            weather,
            payments,
            facilities,
            notifier,
            clock,
            config,
            holds: Arc::new(DashMap::new()),
        }
    }

    pub fn availability(&self) -> &AvailabilityIndex {
        &self.availability
    }

    // ── Booking protocol ───────────────────────────────────────

    /// Validate a booking request and take an exclusive hold on the slot.
    ///
    /// On success the returned booking is `pending`, persisted, and a
    /// hold-timeout countdown is running; the caller must settle payment
    /// within the window or the slot returns to free.
    pub async fn request_booking(
        &self,
        request: BookingRequest,
        now: DateTime<Utc>,
    ) -> BookingResult<Booking> {
        if !self.facilities.exists(&request.facility_id).await? {
            return Err(BookingError::SlotNotFound(format!(
                "unknown facility: {}",
                request.facility_id
            )));
        }

        let key = SlotKey::new(request.facility_id.clone(), request.slot_start);
        let slot = find_slot(&request.facility_id, request.slot_start, now)
            .ok_or_else(|| BookingError::SlotNotFound(key.to_string()))?;

        if slot.is_past {
            return Err(BookingError::SlotInPast(key.to_string()));
        }

        let verdict = self
            .weather
            .playability(&request.facility_id, slot.start, slot.end)
            .await?;
        let weather_risk = match verdict {
            Playability::Closed => {
                return Err(BookingError::WeatherUnplayable(key.to_string()));
            }
            Playability::Degraded => true,
            Playability::Playable => false,
        };

        request.player.validate_details()?;

        let token = self
            .availability
            .try_hold(key.clone())
            .ok_or_else(|| BookingError::SlotAlreadyBooked(key.to_string()))?;

        let booking = Booking::new(slot, request.user_id, request.player, weather_risk, now);

        // Persistence is sequenced after the index transition; if storage
        // rejects the write, the hold is rolled back.
        if let Err(err) = self.save_with_retry(booking.clone()).await {
            self.availability.release(&key, token);
            return Err(err);
        }

        self.holds.insert(booking.id, HoldGuard { key: key.clone(), token });
        self.spawn_hold_timer(booking.id, self.config.hold_timeout);

        info!(
            booking_id = %booking.id,
            slot = %key,
            tier = %booking.slot.tier,
            amount = booking.amount,
            weather_risk,
            "Slot held, awaiting payment"
        );
        Ok(booking)
    }

    /// Drive the payment collaborator for a pending booking: an approved
    /// charge confirms the booking, a declined one abandons it.
    pub async fn settle(&self, booking_id: Uuid) -> BookingResult<Booking> {
        let booking = self.find_required(booking_id).await?;
        if booking.status != BookingStatus::Pending {
            return Err(BookingError::InvalidState(format!(
                "booking {} is {}, not pending",
                booking_id, booking.status
            )));
        }

        match self.payments.charge(booking.id, booking.amount).await? {
            PaymentOutcome::Approved { reference } => {
                self.confirm_payment(booking_id, reference).await
            }
            PaymentOutcome::Declined { reason } => {
                self.abandon(booking_id).await?;
                Err(BookingError::PaymentFailed(reason))
            }
        }
    }

    /// Record a successful external payment: commits the hold and moves
    /// the booking to `confirmed`.
    pub async fn confirm_payment(
        &self,
        booking_id: Uuid,
        payment_reference: impl Into<String>,
    ) -> BookingResult<Booking> {
        let Some((_, guard)) = self.holds.remove(&booking_id) else {
            return Err(BookingError::InvalidState(format!(
                "no active hold for booking {} (expired or already settled)",
                booking_id
            )));
        };

        // The guard proves the hold is unsettled; the commit can only lose
        // to a transition that went through the same guard.
        if !self.availability.commit(&guard.key, guard.token) {
            return Err(BookingError::InvalidState(format!(
                "hold for {} was released before payment confirmation",
                guard.key
            )));
        }

        let mut booking = self.find_required(booking_id).await?;
        booking.confirm(payment_reference);
        self.save_with_retry(booking.clone()).await?;

        info!(booking_id = %booking.id, slot = %guard.key, "Booking confirmed");
        self.notify_best_effort(BookingEvent::BookingConfirmed(BookingConfirmedEvent {
            booking_id: booking.id,
            facility_id: booking.facility_id.clone(),
            user_id: booking.user_id.clone(),
            slot_start: booking.slot.start,
            amount: booking.amount,
            payment_reference: booking.payment_reference.clone().unwrap_or_default(),
            timestamp: self.clock.now(),
        }))
        .await;

        Ok(booking)
    }

    /// Abandon a pending booking (payment failed or the caller walked
    /// away): releases the slot and deletes the booking. Pending
    /// bookings are not retained as history.
    pub async fn abandon(&self, booking_id: Uuid) -> BookingResult<()> {
        let Some((_, guard)) = self.holds.remove(&booking_id) else {
            return Err(BookingError::InvalidState(format!(
                "no active hold for booking {} (expired or already settled)",
                booking_id
            )));
        };

        self.availability.release(&guard.key, guard.token);
        self.repo.delete(booking_id).await?;
        info!(booking_id = %booking_id, slot = %guard.key, "Pending booking abandoned");
        Ok(())
    }

    /// Cancel a confirmed booking, computing the refund per policy and
    /// freeing the slot for others.
    pub async fn cancel_booking(
        &self,
        booking_id: Uuid,
        cancel_at: DateTime<Utc>,
        cause: CancellationCause,
    ) -> BookingResult<Booking> {
        let mut booking = self.find_required(booking_id).await?;
        if booking.status != BookingStatus::Confirmed {
            return Err(BookingError::InvalidState(format!(
                "booking {} is {}, only confirmed bookings can be cancelled",
                booking_id, booking.status
            )));
        }

        let refund = compute_refund(booking.amount, booking.slot.start, cancel_at, cause)?;
        match cause {
            CancellationCause::UserInitiated => booking.cancel(cancel_at, refund),
            CancellationCause::WeatherForced => booking.void_for_weather(cancel_at),
        }

        // Availability-increasing transitions persist first: if storage
        // rejects the write the booking stays confirmed and the slot
        // stays occupied, never the other way around.
        let key = booking.slot_key();
        self.save_with_retry(booking.clone()).await?;
        self.availability.free(&key);

        info!(
            booking_id = %booking.id,
            slot = %key,
            cause = ?cause,
            refund = refund,
            "Booking cancelled, slot freed"
        );

        let event = match cause {
            CancellationCause::UserInitiated => {
                BookingEvent::BookingCancelled(BookingCancelledEvent {
                    booking_id: booking.id,
                    facility_id: booking.facility_id.clone(),
                    user_id: booking.user_id.clone(),
                    slot_start: booking.slot.start,
                    refund_amount: refund,
                    timestamp: cancel_at,
                })
            }
            CancellationCause::WeatherForced => BookingEvent::WeatherVoided(WeatherVoidedEvent {
                booking_id: booking.id,
                facility_id: booking.facility_id.clone(),
                user_id: booking.user_id.clone(),
                slot_start: booking.slot.start,
                refund_amount: refund,
                timestamp: cancel_at,
            }),
        };
        self.notify_best_effort(event).await;

        Ok(booking)
    }

    // ── Queries ────────────────────────────────────────────────

    /// The day's calendar annotated with availability and playability,
    /// for display by the (out of scope) presentation layer.
    pub async fn slot_board(
        &self,
        facility_id: &str,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> BookingResult<Vec<SlotView>> {
        if !self.facilities.exists(facility_id).await? {
            return Err(BookingError::SlotNotFound(format!(
                "unknown facility: {}",
                facility_id
            )));
        }

        let mut board = Vec::with_capacity(crate::domain::slot::SLOTS_PER_DAY);
        for slot in generate_slots(facility_id, date, now) {
            let playability = self
                .weather
                .playability(facility_id, slot.start, slot.end)
                .await?;
            let available = !slot.is_past
                && playability != Playability::Closed
                && self.availability.is_free(&slot.key());
            board.push(SlotView {
                slot,
                available,
                playability,
            });
        }
        Ok(board)
    }

    pub async fn find_booking(&self, booking_id: Uuid) -> BookingResult<Option<Booking>> {
        self.repo.find(booking_id).await
    }

    // ── Background responsibilities ────────────────────────────

    /// One reconciliation pass over confirmed bookings: complete those
    /// whose slot has ended, void those whose window the weather gate now
    /// reports closed. Called periodically by the reconciliation task.
    pub async fn reconcile(&self) -> BookingResult<()> {
        let now = self.clock.now();

        for booking in self.repo.list().await? {
            if booking.status != BookingStatus::Confirmed {
                continue;
            }

            if booking.slot.end <= now {
                self.complete_booking(booking, now).await;
                continue;
            }

            match self
                .weather
                .playability(&booking.facility_id, booking.slot.start, booking.slot.end)
                .await
            {
                Ok(Playability::Closed) => self.void_booking_for_weather(booking, now).await,
                Ok(_) => {}
                Err(err) => {
                    // Weather service outage: leave the booking alone and
                    // let the next sweep decide.
                    warn!(booking_id = %booking.id, error = %err, "Weather check failed during reconciliation");
                }
            }
        }
        Ok(())
    }

    /// Rebuild in-memory state from the repository after a restart.
    ///
    /// Confirmed future bookings re-occupy their slots. Pending bookings
    /// younger than the hold timeout are re-held with a timer for the
    /// remaining window; older ones are orphans of a crashed flow and are
    /// reconciled back to free by deleting them.
    pub async fn recover(&self) -> BookingResult<()> {
        let now = self.clock.now();
        let mut restored = 0usize;
        let mut reheld = 0usize;
        let mut orphaned = 0usize;

        for booking in self.repo.list().await? {
            match booking.status {
                BookingStatus::Confirmed if booking.slot.end > now => {
                    self.availability.restore_booked(booking.slot_key());
                    restored += 1;
                }
                BookingStatus::Pending => {
                    let age_secs = (now - booking.created_at).num_seconds().max(0) as u64;
                    if age_secs >= self.config.hold_timeout.as_secs() {
                        self.repo.delete(booking.id).await?;
                        orphaned += 1;
                    } else {
                        let key = booking.slot_key();
                        match self.availability.try_hold(key.clone()) {
                            Some(token) => {
                                self.holds.insert(booking.id, HoldGuard { key, token });
                                let remaining = self
                                    .config
                                    .hold_timeout
                                    .saturating_sub(Duration::from_secs(age_secs));
                                self.spawn_hold_timer(booking.id, remaining);
                                reheld += 1;
                            }
                            None => {
                                // Slot already taken by a restored confirmed
                                // booking; the pending one lost.
                                self.repo.delete(booking.id).await?;
                                orphaned += 1;
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        info!(restored, reheld, orphaned, "🔁 Availability index recovered from repository");
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────

    fn spawn_hold_timer(&self, booking_id: Uuid, timeout: Duration) {
        let engine = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            engine.expire_hold(booking_id).await;
        });
    }

    /// Fires when the hold timeout elapses. Idempotent against a race
    /// with confirm/abandon: whichever takes the guard first wins.
    async fn expire_hold(&self, booking_id: Uuid) {
        let Some((_, guard)) = self.holds.remove(&booking_id) else {
            return;
        };
        if !self.availability.release(&guard.key, guard.token) {
            return;
        }

        // Informational, not an error: abandoned flows are expected.
        info!(booking_id = %booking_id, slot = %guard.key, "⏰ Hold expired, slot released");

        if let Err(err) = self.repo.delete(booking_id).await {
            warn!(booking_id = %booking_id, error = %err, "Failed to delete expired pending booking");
        }

        self.notify_best_effort(BookingEvent::HoldExpired(HoldExpiredEvent {
            booking_id,
            facility_id: guard.key.facility_id.clone(),
            slot_start: guard.key.start,
            timestamp: self.clock.now(),
        }))
        .await;
    }

    async fn complete_booking(&self, mut booking: Booking, now: DateTime<Utc>) {
        booking.complete();
        let key = booking.slot_key();
        // Persist-then-free, as in cancellation: a failed write leaves
        // the booking confirmed and the slot occupied for the next sweep.
        if let Err(err) = self.save_with_retry(booking.clone()).await {
            warn!(booking_id = %booking.id, error = %err, "Failed to persist completed booking");
            return;
        }
        self.availability.free(&key);
        info!(booking_id = %booking.id, slot = %key, "Booking completed");
        self.notify_best_effort(BookingEvent::BookingCompleted(BookingCompletedEvent {
            booking_id: booking.id,
            facility_id: booking.facility_id,
            user_id: booking.user_id,
            slot_start: booking.slot.start,
            timestamp: now,
        }))
        .await;
    }

    /// Weather-forced voiding of a confirmed booking: full refund, slot
    /// freed. The state transition and refund are persisted together;
    /// notification delivery happens after and cannot roll them back.
    async fn void_booking_for_weather(&self, mut booking: Booking, now: DateTime<Utc>) {
        booking.void_for_weather(now);
        let key = booking.slot_key();
        if let Err(err) = self.save_with_retry(booking.clone()).await {
            warn!(booking_id = %booking.id, error = %err, "Failed to persist weather-voided booking");
            return;
        }
        self.availability.free(&key);

        info!(
            booking_id = %booking.id,
            slot = %key,
            refund = booking.amount,
            "🌧 Confirmed booking voided: weather closed the slot"
        );
        self.notify_best_effort(BookingEvent::WeatherVoided(WeatherVoidedEvent {
            booking_id: booking.id,
            facility_id: booking.facility_id.clone(),
            user_id: booking.user_id.clone(),
            slot_start: booking.slot.start,
            refund_amount: booking.amount,
            timestamp: now,
        }))
        .await;
    }

    async fn find_required(&self, booking_id: Uuid) -> BookingResult<Booking> {
        self.repo.find(booking_id).await?.ok_or_else(|| {
            BookingError::InvalidState(format!("booking {} not found", booking_id))
        })
    }

    async fn save_with_retry(&self, booking: Booking) -> BookingResult<()> {
        retry_with_backoff(
            self.config.retry.clone(),
            || self.repo.save(booking.clone()),
            |err| err.is_transient(),
            "booking_save",
        )
        .await
    }

    async fn notify_best_effort(&self, event: BookingEvent) {
        if let Err(err) = self.notifier.notify(event).await {
            warn!(error = %err, "Notification delivery failed");
        }
    }
}
