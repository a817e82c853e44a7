//! Outbound ports: interfaces the engine depends on
//!
//! Every external collaborator (clock, weather service, payment
//! processor, facility catalogue, user notification) is a trait here,
//! with adapter implementations in `infrastructure`. The engine is
//! constructible from any combination of implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::error::BookingResult;
use crate::notifications::BookingEvent;

/// Supplies the current instant; abstracted so past/future checks in
/// background tasks are testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Weather-derived verdict for a time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playability {
    /// Fine to play and book
    Playable,
    /// Bookable, but flagged as a weather risk (advisory only)
    Degraded,
    /// Forbids booking and triggers voiding of confirmed bookings
    Closed,
}

/// External weather service consulted per time window.
#[async_trait]
pub trait WeatherGate: Send + Sync {
    async fn playability(
        &self,
        facility_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> BookingResult<Playability>;
}

/// Outcome of a charge attempt by the payment collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Approved { reference: String },
    Declined { reason: String },
}

/// External payment processor. The engine never computes or validates
/// payment internally; it only records the returned reference.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, booking_id: Uuid, amount: u32) -> BookingResult<PaymentOutcome>;
}

/// Facility catalogue; the engine only needs existence.
#[async_trait]
pub trait FacilityDirectory: Send + Sync {
    async fn exists(&self, facility_id: &str) -> BookingResult<bool>;
}

/// User notification collaborator. Delivery is best-effort: a failure is
/// logged and never rolls back a persisted state transition.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: BookingEvent) -> BookingResult<()>;
}
