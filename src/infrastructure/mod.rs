//! Infrastructure adapters
//!
//! Implementations of the domain ports: in-memory persistence, the
//! system clock, and reference collaborators for weather, payments and
//! the facility catalogue.

pub mod clock;
pub mod facilities;
pub mod payments;
pub mod storage;
pub mod weather;

pub use clock::{ManualClock, SystemClock};
pub use facilities::StaticFacilityDirectory;
pub use payments::AutoApprovePayments;
pub use storage::InMemoryBookingRepository;
pub use weather::StaticWeatherGate;
