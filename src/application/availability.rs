//! Availability index
//!
//! Tracks the allocation state per slot identity. `try_hold` is the sole
//! admission-control point: for any key, exactly one concurrent caller
//! observes success; everyone else fails fast with no queueing. Per-key
//! mutual exclusion comes from the map's entry locking, so operations on
//! different keys never block each other.
//!
//! Holds carry a token. The hold-timeout task and the payment path race
//! for the same entry; the token makes the loser's release/commit a
//! no-op, so a hold is settled exactly once.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::slot::SlotKey;

/// Opaque proof of holding a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldToken(Uuid);

impl HoldToken {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Allocation state of a slot. `free` is the absence of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Short-lived exclusive claim pending payment
    Held { token: HoldToken },
    /// Confirmed booking owns the slot
    Booked,
}

/// Per-slot allocation state for all facilities.
#[derive(Default)]
pub struct AvailabilityIndex {
    slots: DashMap<SlotKey, SlotState>,
}

impl AvailabilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically transition free → held. Fails when the slot is held
    /// or booked by anyone, including the same caller.
    pub fn try_hold(&self, key: SlotKey) -> Option<HoldToken> {
        match self.slots.entry(key) {
            Entry::Occupied(_) => None,
            Entry::Vacant(vacant) => {
                let token = HoldToken::new();
                vacant.insert(SlotState::Held { token });
                Some(token)
            }
        }
    }

    /// Transition held → booked. Fails if the hold was already settled
    /// (token mismatch) or the slot is not held.
    pub fn commit(&self, key: &SlotKey, token: HoldToken) -> bool {
        match self.slots.get_mut(key) {
            Some(mut state) => match *state {
                SlotState::Held { token: held } if held == token => {
                    *state = SlotState::Booked;
                    true
                }
                _ => false,
            },
            None => false,
        }
    }

    /// Transition held → free. No-op when the slot is booked, already
    /// free, or held under a different token.
    pub fn release(&self, key: &SlotKey, token: HoldToken) -> bool {
        self.slots
            .remove_if(key, |_, state| {
                matches!(state, SlotState::Held { token: held } if *held == token)
            })
            .is_some()
    }

    /// Transition booked → free (cancellation / weather voiding), making
    /// the slot bookable again by others.
    pub fn free(&self, key: &SlotKey) -> bool {
        self.slots
            .remove_if(key, |_, state| matches!(state, SlotState::Booked))
            .is_some()
    }

    /// Mark a slot as booked without going through a hold. Recovery only.
    pub fn restore_booked(&self, key: SlotKey) {
        self.slots.insert(key, SlotState::Booked);
    }

    pub fn is_free(&self, key: &SlotKey) -> bool {
        !self.slots.contains_key(key)
    }

    pub fn state(&self, key: &SlotKey) -> Option<SlotState> {
        self.slots.get(key).map(|s| *s)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;

    fn key() -> SlotKey {
        SlotKey::new("main-ground", "2026-09-01T18:00:00Z".parse().unwrap())
    }

    #[test]
    fn hold_commit_free_lifecycle() {
        let index = AvailabilityIndex::new();
        let k = key();
        assert!(index.is_free(&k));

        let token = index.try_hold(k.clone()).unwrap();
        assert!(!index.is_free(&k));
        assert!(index.try_hold(k.clone()).is_none());

        assert!(index.commit(&k, token));
        assert_eq!(index.state(&k), Some(SlotState::Booked));

        assert!(index.free(&k));
        assert!(index.is_free(&k));
    }

    #[test]
    fn release_returns_held_slot_to_free() {
        let index = AvailabilityIndex::new();
        let k = key();
        let token = index.try_hold(k.clone()).unwrap();
        assert!(index.release(&k, token));
        assert!(index.is_free(&k));
        // and the slot is bookable again
        assert!(index.try_hold(k).is_some());
    }

    #[test]
    fn release_is_noop_on_booked_or_stale_token() {
        let index = AvailabilityIndex::new();
        let k = key();
        let token = index.try_hold(k.clone()).unwrap();
        assert!(index.commit(&k, token));

        // hold already committed; a late timeout release must not free it
        assert!(!index.release(&k, token));
        assert_eq!(index.state(&k), Some(SlotState::Booked));

        index.free(&k);
        let second = index.try_hold(k.clone()).unwrap();
        // stale token from the first hold cannot release the second
        assert!(!index.release(&k, token));
        assert_eq!(index.state(&k), Some(SlotState::Held { token: second }));
    }

    #[test]
    fn commit_fails_after_release() {
        let index = AvailabilityIndex::new();
        let k = key();
        let token = index.try_hold(k.clone()).unwrap();
        assert!(index.release(&k, token));
        assert!(!index.commit(&k, token));
        assert!(index.is_free(&k));
    }

    #[test]
    fn free_is_noop_on_held() {
        let index = AvailabilityIndex::new();
        let k = key();
        let _token = index.try_hold(k.clone()).unwrap();
        assert!(!index.free(&k));
        assert!(!index.is_free(&k));
    }

    #[test]
    fn distinct_keys_are_independent() {
        let index = AvailabilityIndex::new();
        let a = key();
        let b = SlotKey::new("main-ground", "2026-09-01T19:00:00Z".parse().unwrap());
        let c = SlotKey::new("practice-net-1", a.start);

        assert!(index.try_hold(a.clone()).is_some());
        assert!(index.try_hold(b).is_some());
        assert!(index.try_hold(c).is_some());
        assert!(index.try_hold(a).is_none());
    }

    #[tokio::test]
    async fn concurrent_try_hold_admits_exactly_one() {
        let index = Arc::new(AvailabilityIndex::new());
        let k = SlotKey::new("main-ground", Utc::now());

        let mut handles = Vec::new();
        for _ in 0..64 {
            let index = index.clone();
            let k = k.clone();
            handles.push(tokio::spawn(async move { index.try_hold(k).is_some() }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
