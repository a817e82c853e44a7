//! Notifications module
//!
//! Booking lifecycle events published on an in-process broadcast bus.
//! The engine talks to the `Notifier` port; `BusNotifier` is the default
//! adapter, forwarding events here for whatever transport the surrounding
//! system chooses (the API layer is out of scope).

pub mod event_bus;
pub mod events;

pub use event_bus::{create_event_bus, BusNotifier, EventBus, EventSubscriber, SharedEventBus};
pub use events::*;
