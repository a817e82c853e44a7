//! Booking lifecycle events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event types emitted by the reservation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BookingEvent {
    /// Payment confirmed, booking owns its slot
    BookingConfirmed(BookingConfirmedEvent),
    /// User cancelled a confirmed booking
    BookingCancelled(BookingCancelledEvent),
    /// The weather closed the slot; the booking was voided by the system
    WeatherVoided(WeatherVoidedEvent),
    /// A held slot was not paid for in time and was released
    HoldExpired(HoldExpiredEvent),
    /// Slot end passed with no cancellation
    BookingCompleted(BookingCompletedEvent),
}

impl BookingEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::BookingConfirmed(_) => "booking_confirmed",
            Self::BookingCancelled(_) => "booking_cancelled",
            Self::WeatherVoided(_) => "weather_voided",
            Self::HoldExpired(_) => "hold_expired",
            Self::BookingCompleted(_) => "booking_completed",
        }
    }

    /// The facility the event concerns
    pub fn facility_id(&self) -> &str {
        match self {
            Self::BookingConfirmed(e) => &e.facility_id,
            Self::BookingCancelled(e) => &e.facility_id,
            Self::WeatherVoided(e) => &e.facility_id,
            Self::HoldExpired(e) => &e.facility_id,
            Self::BookingCompleted(e) => &e.facility_id,
        }
    }

    /// The user to notify, where one is affected
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::BookingConfirmed(e) => Some(&e.user_id),
            Self::BookingCancelled(e) => Some(&e.user_id),
            Self::WeatherVoided(e) => Some(&e.user_id),
            Self::HoldExpired(_) => None,
            Self::BookingCompleted(e) => Some(&e.user_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmedEvent {
    pub booking_id: Uuid,
    pub facility_id: String,
    pub user_id: String,
    pub slot_start: DateTime<Utc>,
    pub amount: u32,
    pub payment_reference: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCancelledEvent {
    pub booking_id: Uuid,
    pub facility_id: String,
    pub user_id: String,
    pub slot_start: DateTime<Utc>,
    pub refund_amount: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherVoidedEvent {
    pub booking_id: Uuid,
    pub facility_id: String,
    pub user_id: String,
    pub slot_start: DateTime<Utc>,
    pub refund_amount: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldExpiredEvent {
    pub booking_id: Uuid,
    pub facility_id: String,
    pub slot_start: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCompletedEvent {
    pub booking_id: Uuid,
    pub facility_id: String,
    pub user_id: String,
    pub slot_start: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

/// Wrapper for sending events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: BookingEvent,
}

impl EventMessage {
    pub fn new(event: BookingEvent) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}
