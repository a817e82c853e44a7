pub mod availability;
pub mod engine;
pub mod services;

pub use availability::{AvailabilityIndex, HoldToken, SlotState};
pub use engine::{BookingRequest, EngineConfig, ReservationEngine, SlotView};
pub use services::start_reconciliation_task;
