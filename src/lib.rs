//! # Turf Booking Service
//!
//! Slot reservation engine for a cricket turf facility: slot generation,
//! weather-gated availability, exclusive allocation under concurrent
//! requests, and the booking lifecycle state machine.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, the refund policy and port traits
//! - **application**: The availability index, the reservation engine and
//!   background reconciliation
//! - **infrastructure**: Adapter implementations (in-memory repository,
//!   system clock, weather/payment/facility stubs)
//! - **notifications**: Broadcast event bus for booking lifecycle events
//! - **shared**: Shutdown coordination and retry helpers

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod notifications;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export the engine surface for easy access
pub use application::{AvailabilityIndex, BookingRequest, EngineConfig, ReservationEngine};
pub use domain::{
    Booking, BookingError, BookingResult, BookingStatus, CancellationCause, PlayerDetails,
    Playability, PricingTier, SlotKey, TimeSlot,
};

// Re-export notifications
pub use notifications::{create_event_bus, BookingEvent, EventBus, SharedEventBus};
