pub mod booking;
pub mod error;
pub mod policy;
pub mod ports;
pub mod slot;

// Re-export commonly used types
pub use booking::{Booking, BookingRepository, BookingStatus, PlayerDetails};
pub use error::{BookingError, BookingResult};
pub use policy::{compute_refund, CancellationCause};
pub use ports::{
    Clock, FacilityDirectory, Notifier, PaymentGateway, PaymentOutcome, Playability, WeatherGate,
};
pub use slot::{generate_slots, PricingTier, SlotKey, TimeSlot};
