//! Booking repository interface
//!
//! Durable storage is an external collaborator behind this trait. The
//! engine depends on it for persistence; the repository never mutates
//! business state.

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Booking;
use crate::domain::error::BookingResult;
use crate::domain::slot::SlotKey;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Save a new booking or overwrite an existing one by id
    async fn save(&self, booking: Booking) -> BookingResult<()>;

    /// Find a booking by id
    async fn find(&self, id: Uuid) -> BookingResult<Option<Booking>>;

    /// Find the pending or confirmed booking occupying a slot, if any.
    /// Used for recovery and reconciliation.
    async fn find_by_slot(&self, key: &SlotKey) -> BookingResult<Option<Booking>>;

    /// Delete a booking (only pending bookings are ever deleted; the
    /// confirmed lifecycle is durable history)
    async fn delete(&self, id: Uuid) -> BookingResult<()>;

    /// All stored bookings, any status. Used by the reconciliation sweep.
    async fn list(&self) -> BookingResult<Vec<Booking>>;
}
