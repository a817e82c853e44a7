mod calendar;
mod model;

pub use calendar::{find_slot, generate_slots, CLOSE_HOUR, OPEN_HOUR, SLOTS_PER_DAY};
pub use model::{PricingTier, SlotKey, TimeSlot};
