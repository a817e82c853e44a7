//! Static weather gate
//!
//! Reference `WeatherGate` adapter with a fixed default verdict and
//! per-window overrides. The real forecast integration lives outside
//! this service; simulations and tests script this one instead, so the
//! engine itself never contains randomness.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::error::BookingResult;
use crate::domain::ports::{Playability, WeatherGate};
use crate::domain::slot::SlotKey;

pub struct StaticWeatherGate {
    default: Playability,
    overrides: DashMap<SlotKey, Playability>,
}

impl StaticWeatherGate {
    pub fn new(default: Playability) -> Self {
        Self {
            default,
            overrides: DashMap::new(),
        }
    }

    /// Everything playable.
    pub fn always_playable() -> Self {
        Self::new(Playability::Playable)
    }

    /// Script the verdict for one window.
    pub fn set_window(&self, facility_id: impl Into<String>, start: DateTime<Utc>, verdict: Playability) {
        self.overrides
            .insert(SlotKey::new(facility_id, start), verdict);
    }
}

#[async_trait]
impl WeatherGate for StaticWeatherGate {
    async fn playability(
        &self,
        facility_id: &str,
        window_start: DateTime<Utc>,
        _window_end: DateTime<Utc>,
    ) -> BookingResult<Playability> {
        let key = SlotKey::new(facility_id, window_start);
        Ok(self
            .overrides
            .get(&key)
            .map(|v| *v)
            .unwrap_or(self.default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn override_beats_default() {
        let gate = StaticWeatherGate::always_playable();
        let start: DateTime<Utc> = "2026-09-01T18:00:00Z".parse().unwrap();
        let end = start + chrono::Duration::hours(1);

        assert_eq!(
            gate.playability("main-ground", start, end).await.unwrap(),
            Playability::Playable
        );

        gate.set_window("main-ground", start, Playability::Closed);
        assert_eq!(
            gate.playability("main-ground", start, end).await.unwrap(),
            Playability::Closed
        );
        // other facilities unaffected
        assert_eq!(
            gate.playability("practice-net-1", start, end).await.unwrap(),
            Playability::Playable
        );
    }
}
