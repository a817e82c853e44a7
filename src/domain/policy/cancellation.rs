//! Cancellation refund policy
//!
//! Pure function of the booking amount, the time remaining until the
//! slot starts, and the cancellation cause.

use chrono::{DateTime, Duration, Utc};

use crate::domain::error::{BookingError, BookingResult};

/// Why a booking is being cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationCause {
    /// The user chose to cancel
    UserInitiated,
    /// The system voided the booking after the weather closed the slot
    WeatherForced,
}

/// Compute the refund for cancelling a booking.
///
/// Weather-forced cancellations refund in full regardless of timing.
/// User-initiated cancellations refund 100% at 24h or more before the
/// slot start, 50% between 12h and 24h, and nothing below 12h.
///
/// Cancelling a slot that is already underway or past is a caller error
/// (`InvalidState`), not a 0% refund.
pub fn compute_refund(
    amount: u32,
    slot_start: DateTime<Utc>,
    cancel_at: DateTime<Utc>,
    cause: CancellationCause,
) -> BookingResult<u32> {
    if cancel_at >= slot_start {
        return Err(BookingError::InvalidState(format!(
            "cannot cancel a slot that started at {}",
            slot_start.to_rfc3339()
        )));
    }

    let refund_percent = match cause {
        CancellationCause::WeatherForced => 100,
        CancellationCause::UserInitiated => {
            let notice = slot_start - cancel_at;
            if notice >= Duration::hours(24) {
                100
            } else if notice >= Duration::hours(12) {
                50
            } else {
                0
            }
        }
    };

    Ok(amount * refund_percent / 100)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> DateTime<Utc> {
        "2026-09-02T18:00:00Z".parse().unwrap()
    }

    fn hours_before(h: i64) -> DateTime<Utc> {
        start() - Duration::hours(h)
    }

    #[test]
    fn full_refund_at_24h_or_more() {
        let r = compute_refund(45, start(), hours_before(30), CancellationCause::UserInitiated);
        assert_eq!(r.unwrap(), 45);
        let r = compute_refund(45, start(), hours_before(24), CancellationCause::UserInitiated);
        assert_eq!(r.unwrap(), 45);
    }

    #[test]
    fn half_refund_between_12h_and_24h() {
        let r = compute_refund(30, start(), hours_before(18), CancellationCause::UserInitiated);
        assert_eq!(r.unwrap(), 15);
        let r = compute_refund(30, start(), hours_before(12), CancellationCause::UserInitiated);
        assert_eq!(r.unwrap(), 15);
        // just under 24h is still the 50% band
        let r = compute_refund(
            30,
            start(),
            start() - Duration::hours(24) + Duration::minutes(1),
            CancellationCause::UserInitiated,
        );
        assert_eq!(r.unwrap(), 15);
    }

    #[test]
    fn no_refund_below_12h() {
        let r = compute_refund(45, start(), hours_before(6), CancellationCause::UserInitiated);
        assert_eq!(r.unwrap(), 0);
        let r = compute_refund(
            45,
            start(),
            start() - Duration::minutes(1),
            CancellationCause::UserInitiated,
        );
        assert_eq!(r.unwrap(), 0);
    }

    #[test]
    fn weather_forced_always_refunds_in_full() {
        for h in [30, 18, 6, 1] {
            let r = compute_refund(45, start(), hours_before(h), CancellationCause::WeatherForced);
            assert_eq!(r.unwrap(), 45, "{}h before", h);
        }
    }

    #[test]
    fn cancelling_a_started_slot_is_invalid_state() {
        for at in [start(), start() + Duration::minutes(5)] {
            let err =
                compute_refund(45, start(), at, CancellationCause::UserInitiated).unwrap_err();
            assert!(matches!(err, BookingError::InvalidState(_)));
            // weather-forced is rejected the same way
            let err =
                compute_refund(45, start(), at, CancellationCause::WeatherForced).unwrap_err();
            assert!(matches!(err, BookingError::InvalidState(_)));
        }
    }
}
