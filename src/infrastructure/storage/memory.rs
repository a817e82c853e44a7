//! In-memory booking repository for development and testing

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingRepository, BookingStatus};
use crate::domain::error::BookingResult;
use crate::domain::slot::SlotKey;

#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: DashMap<Uuid, Booking>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn save(&self, booking: Booking) -> BookingResult<()> {
        self.bookings.insert(booking.id, booking);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> BookingResult<Option<Booking>> {
        Ok(self.bookings.get(&id).map(|b| b.clone()))
    }

    async fn find_by_slot(&self, key: &SlotKey) -> BookingResult<Option<Booking>> {
        Ok(self
            .bookings
            .iter()
            .find(|b| {
                b.slot_key() == *key
                    && matches!(b.status, BookingStatus::Pending | BookingStatus::Confirmed)
            })
            .map(|b| b.clone()))
    }

    async fn delete(&self, id: Uuid) -> BookingResult<()> {
        self.bookings.remove(&id);
        Ok(())
    }

    async fn list(&self) -> BookingResult<Vec<Booking>> {
        Ok(self.bookings.iter().map(|b| b.clone()).collect())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::PlayerDetails;
    use crate::domain::slot::find_slot;
    use chrono::{Duration, Utc};

    fn booking_for_hour(hour: u32) -> Booking {
        let now = Utc::now();
        let tomorrow = (now + Duration::days(1)).date_naive();
        let start = tomorrow.and_hms_opt(hour, 0, 0).unwrap().and_utc();
        let slot = find_slot("main-ground", start, now).unwrap();
        Booking::new(
            slot,
            "user-1",
            PlayerDetails {
                name: "Asha Patel".to_string(),
                phone: "+998901234567".to_string(),
                email: "asha@example.com".to_string(),
                team_size: 11,
                notes: String::new(),
            },
            false,
            now,
        )
    }

    #[tokio::test]
    async fn save_find_delete_roundtrip() {
        let repo = InMemoryBookingRepository::new();
        let booking = booking_for_hour(18);
        let id = booking.id;

        repo.save(booking).await.unwrap();
        assert!(repo.find(id).await.unwrap().is_some());

        repo.delete(id).await.unwrap();
        assert!(repo.find(id).await.unwrap().is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn find_by_slot_only_sees_active_bookings() {
        let repo = InMemoryBookingRepository::new();
        let mut cancelled = booking_for_hour(18);
        let key = cancelled.slot_key();
        cancelled.confirm("PAY-1");
        cancelled.cancel(Utc::now(), 0);
        repo.save(cancelled).await.unwrap();

        // a terminal booking does not occupy the slot
        assert!(repo.find_by_slot(&key).await.unwrap().is_none());

        let active = booking_for_hour(18);
        repo.save(active.clone()).await.unwrap();
        let found = repo.find_by_slot(&key).await.unwrap().unwrap();
        assert_eq!(found.id, active.id);
    }

    #[tokio::test]
    async fn list_returns_every_status() {
        let repo = InMemoryBookingRepository::new();
        let mut confirmed = booking_for_hour(10);
        confirmed.confirm("PAY-1");
        repo.save(confirmed).await.unwrap();
        repo.save(booking_for_hour(11)).await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }
}
