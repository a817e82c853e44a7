//! Time slot value objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a bookable slot: facility + start instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub facility_id: String,
    pub start: DateTime<Utc>,
}

impl SlotKey {
    pub fn new(facility_id: impl Into<String>, start: DateTime<Utc>) -> Self {
        Self {
            facility_id: facility_id.into(),
            start,
        }
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.facility_id, self.start.to_rfc3339())
    }
}

/// Pricing tier, a pure function of the slot's start hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingTier {
    /// Evening prime time, hours 16-19
    Peak,
    /// Daytime hours
    Standard,
    /// Early morning (before 9) and late evening (20+)
    OffPeak,
}

impl PricingTier {
    /// Tier for a given start hour (0-23).
    pub fn for_hour(hour: u32) -> Self {
        if (16..20).contains(&hour) {
            Self::Peak
        } else if hour < 9 || hour >= 20 {
            Self::OffPeak
        } else {
            Self::Standard
        }
    }

    /// Slot price in whole base currency units.
    pub fn price(&self) -> u32 {
        match self {
            Self::Peak => 45,
            Self::Standard => 30,
            Self::OffPeak => 25,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Peak => "peak",
            Self::Standard => "standard",
            Self::OffPeak => "off-peak",
        }
    }
}

impl std::fmt::Display for PricingTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fixed 1-hour bookable time window for a facility.
///
/// Not separately persisted; bookings carry an immutable snapshot so the
/// price and tier stay frozen even if calendar rules change later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub facility_id: String,
    pub start: DateTime<Utc>,
    /// Always `start + 1 hour`
    pub end: DateTime<Utc>,
    pub tier: PricingTier,
    /// Price in whole base currency units, fixed per tier
    pub price: u32,
    /// Derived at query time, never stored
    pub is_past: bool,
}

impl TimeSlot {
    pub fn key(&self) -> SlotKey {
        SlotKey::new(self.facility_id.clone(), self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_table_matches_hours() {
        assert_eq!(PricingTier::for_hour(6), PricingTier::OffPeak);
        assert_eq!(PricingTier::for_hour(8), PricingTier::OffPeak);
        assert_eq!(PricingTier::for_hour(9), PricingTier::Standard);
        assert_eq!(PricingTier::for_hour(15), PricingTier::Standard);
        assert_eq!(PricingTier::for_hour(16), PricingTier::Peak);
        assert_eq!(PricingTier::for_hour(19), PricingTier::Peak);
        assert_eq!(PricingTier::for_hour(20), PricingTier::OffPeak);
        assert_eq!(PricingTier::for_hour(21), PricingTier::OffPeak);
    }

    #[test]
    fn tier_prices_are_fixed() {
        assert_eq!(PricingTier::Peak.price(), 45);
        assert_eq!(PricingTier::Standard.price(), 30);
        assert_eq!(PricingTier::OffPeak.price(), 25);
    }

    #[test]
    fn slot_key_display_includes_facility_and_start() {
        let start = "2026-09-01T18:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let key = SlotKey::new("main-ground", start);
        let shown = key.to_string();
        assert!(shown.starts_with("main-ground@2026-09-01"));
    }
}
