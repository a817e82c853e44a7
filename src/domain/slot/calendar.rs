//! Slot calendar generation
//!
//! Pure functions: the canonical set of bookable windows for a facility
//! and date is fully determined by the inputs, with no hidden state.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::model::{PricingTier, TimeSlot};

/// First bookable start hour of the operating day.
pub const OPEN_HOUR: u32 = 6;
/// Operating day ends at this hour; the last slot starts one hour before.
pub const CLOSE_HOUR: u32 = 22;
/// Slots per operating day (start hours 6 through 21 inclusive).
pub const SLOTS_PER_DAY: usize = (CLOSE_HOUR - OPEN_HOUR) as usize;

/// Generate the canonical slot set for a facility and date, in ascending
/// start-time order. `now` drives the derived `is_past` flag only.
pub fn generate_slots(facility_id: &str, date: NaiveDate, now: DateTime<Utc>) -> Vec<TimeSlot> {
    (OPEN_HOUR..CLOSE_HOUR)
        .map(|hour| {
            let start = date
                .and_hms_opt(hour, 0, 0)
                .expect("operating hours are valid times")
                .and_utc();
            let tier = PricingTier::for_hour(hour);
            TimeSlot {
                facility_id: facility_id.to_string(),
                start,
                end: start + Duration::hours(1),
                tier,
                price: tier.price(),
                is_past: start < now,
            }
        })
        .collect()
}

/// Look up the canonical slot matching a requested start instant, or
/// `None` if the instant is not a slot boundary of the operating day.
pub fn find_slot(
    facility_id: &str,
    start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<TimeSlot> {
    generate_slots(facility_id, start.date_naive(), now)
        .into_iter()
        .find(|slot| slot.start == start)
}
