//! Booking domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::error::{BookingError, BookingResult};
use crate::domain::slot::{SlotKey, TimeSlot};

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Slot is held, awaiting payment confirmation
    Pending,
    /// Paid and owned until cancelled, voided or completed
    Confirmed,
    /// Cancelled by the user (terminal)
    Cancelled,
    /// Slot end passed without cancellation (terminal)
    Completed,
    /// Voided by the system after the weather closed the slot (terminal)
    WeatherVoided,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::WeatherVoided => "weather_voided",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            "completed" => Some(Self::Completed),
            "weather_voided" => Some(Self::WeatherVoided),
            _ => None,
        }
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed | Self::WeatherVoided)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sizes the facility can host (5/6/8-a-side and full teams).
pub const ALLOWED_TEAM_SIZES: [u8; 4] = [5, 6, 8, 11];

/// Contact and team details collected with a booking.
///
/// Opaque to the engine beyond well-formedness checks.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlayerDetails {
    #[validate(length(min = 1, max = 100, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 7, max = 20, message = "phone must be 7-20 characters"))]
    pub phone: String,
    #[validate(email(message = "email must be well-formed"))]
    pub email: String,
    pub team_size: u8,
    #[validate(length(max = 500, message = "notes are limited to 500 characters"))]
    #[serde(default)]
    pub notes: String,
}

impl PlayerDetails {
    /// Full validation: field well-formedness plus team-size membership.
    pub fn validate_details(&self) -> BookingResult<()> {
        self.validate().map_err(|errors| {
            let fields: Vec<String> = errors
                .field_errors()
                .iter()
                .flat_map(|(field, errs)| {
                    errs.iter().map(move |e| {
                        let msg = e
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{:?}", e.code));
                        format!("{}: {}", field, msg)
                    })
                })
                .collect();
            BookingError::InvalidPlayerDetails(fields.join("; "))
        })?;

        if !ALLOWED_TEAM_SIZES.contains(&self.team_size) {
            return Err(BookingError::InvalidPlayerDetails(format!(
                "team_size: {} is not one of {:?}",
                self.team_size, ALLOWED_TEAM_SIZES
            )));
        }
        Ok(())
    }
}

/// A booking of one slot by one user.
///
/// Only the engine creates bookings and mutates their status; the
/// repository stores and retrieves, never touching business state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Opaque identifier, generated at creation
    pub id: Uuid,
    pub facility_id: String,
    /// Immutable slot snapshot; price and tier are frozen at booking time
    pub slot: TimeSlot,
    /// Opaque authenticated-user identifier
    pub user_id: String,
    pub player: PlayerDetails,
    pub status: BookingStatus,
    /// Equals `slot.price` at creation
    pub amount: u32,
    /// Set once the payment collaborator confirms
    pub payment_reference: Option<String>,
    /// Booked under a degraded (but playable) weather verdict
    pub weather_risk: bool,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub refund_amount: Option<u32>,
}

impl Booking {
    pub fn new(
        slot: TimeSlot,
        user_id: impl Into<String>,
        player: PlayerDetails,
        weather_risk: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            facility_id: slot.facility_id.clone(),
            amount: slot.price,
            slot,
            user_id: user_id.into(),
            player,
            status: BookingStatus::Pending,
            payment_reference: None,
            weather_risk,
            created_at,
            cancelled_at: None,
            refund_amount: None,
        }
    }

    pub fn slot_key(&self) -> SlotKey {
        self.slot.key()
    }

    /// Payment confirmed: pending → confirmed.
    pub fn confirm(&mut self, payment_reference: impl Into<String>) {
        self.status = BookingStatus::Confirmed;
        self.payment_reference = Some(payment_reference.into());
    }

    /// User-initiated cancellation: confirmed → cancelled.
    pub fn cancel(&mut self, cancelled_at: DateTime<Utc>, refund_amount: u32) {
        self.status = BookingStatus::Cancelled;
        self.cancelled_at = Some(cancelled_at);
        self.refund_amount = Some(refund_amount);
    }

    /// System-initiated weather voiding: confirmed → weather_voided,
    /// always with a full refund.
    pub fn void_for_weather(&mut self, voided_at: DateTime<Utc>) {
        self.status = BookingStatus::WeatherVoided;
        self.cancelled_at = Some(voided_at);
        self.refund_amount = Some(self.amount);
    }

    /// Slot end passed with no cancellation: confirmed → completed.
    pub fn complete(&mut self) {
        self.status = BookingStatus::Completed;
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::slot::find_slot;
    use chrono::Duration;

    pub fn sample_player() -> PlayerDetails {
        PlayerDetails {
            name: "Asha Patel".to_string(),
            phone: "+998901234567".to_string(),
            email: "asha@example.com".to_string(),
            team_size: 11,
            notes: String::new(),
        }
    }

    fn sample_booking() -> Booking {
        let now = Utc::now();
        let tomorrow = (now + Duration::days(1)).date_naive();
        let start = tomorrow.and_hms_opt(18, 0, 0).unwrap().and_utc();
        let slot = find_slot("main-ground", start, now).unwrap();
        Booking::new(slot, "user-1", sample_player(), false, now)
    }

    #[test]
    fn new_booking_is_pending_with_frozen_price() {
        let b = sample_booking();
        assert_eq!(b.status, BookingStatus::Pending);
        assert_eq!(b.amount, 45); // 18:00 is peak
        assert_eq!(b.amount, b.slot.price);
        assert!(b.payment_reference.is_none());
        assert!(b.refund_amount.is_none());
    }

    #[test]
    fn confirm_stores_payment_reference() {
        let mut b = sample_booking();
        b.confirm("PAY-123456");
        assert_eq!(b.status, BookingStatus::Confirmed);
        assert_eq!(b.payment_reference.as_deref(), Some("PAY-123456"));
    }

    #[test]
    fn cancel_records_refund_and_timestamp() {
        let mut b = sample_booking();
        b.confirm("PAY-1");
        let at = Utc::now();
        b.cancel(at, 22);
        assert_eq!(b.status, BookingStatus::Cancelled);
        assert_eq!(b.cancelled_at, Some(at));
        assert_eq!(b.refund_amount, Some(22));
        assert!(b.status.is_terminal());
    }

    #[test]
    fn weather_voiding_refunds_in_full() {
        let mut b = sample_booking();
        b.confirm("PAY-1");
        b.void_for_weather(Utc::now());
        assert_eq!(b.status, BookingStatus::WeatherVoided);
        assert_eq!(b.refund_amount, Some(b.amount));
        assert!(b.status.is_terminal());
    }

    #[test]
    fn status_roundtrip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
            BookingStatus::WeatherVoided,
        ] {
            assert_eq!(BookingStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::from_str("unknown"), None);
    }

    #[test]
    fn valid_player_details_pass() {
        assert!(sample_player().validate_details().is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut p = sample_player();
        p.name = String::new();
        let err = p.validate_details().unwrap_err();
        assert!(matches!(err, BookingError::InvalidPlayerDetails(_)));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut p = sample_player();
        p.email = "not-an-email".to_string();
        assert!(p.validate_details().is_err());
    }

    #[test]
    fn short_phone_is_rejected() {
        let mut p = sample_player();
        p.phone = "123".to_string();
        assert!(p.validate_details().is_err());
    }

    #[test]
    fn team_size_must_be_supported() {
        for size in ALLOWED_TEAM_SIZES {
            let mut p = sample_player();
            p.team_size = size;
            assert!(p.validate_details().is_ok(), "size {}", size);
        }
        let mut p = sample_player();
        p.team_size = 7;
        assert!(p.validate_details().is_err());
    }
}
