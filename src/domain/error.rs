//! Domain errors

use thiserror::Error;

/// Errors produced by the reservation engine.
///
/// `SlotAlreadyBooked` is an expected outcome of legitimate contention,
/// not an infrastructure failure; callers must be able to tell it apart
/// from `RepositoryUnavailable`, which is the only retryable kind.
#[derive(Debug, Clone, Error)]
pub enum BookingError {
    /// The requested slot does not exist in the facility calendar
    #[error("Slot not found: {0}")]
    SlotNotFound(String),

    /// The requested slot has already started
    #[error("Slot is in the past: {0}")]
    SlotInPast(String),

    /// Weather verdict forbids playing this slot
    #[error("Slot is not playable due to weather: {0}")]
    WeatherUnplayable(String),

    /// Player details failed validation
    #[error("Invalid player details: {0}")]
    InvalidPlayerDetails(String),

    /// Another caller holds or has booked the slot
    #[error("Slot already booked: {0}")]
    SlotAlreadyBooked(String),

    /// Bad lifecycle transition (e.g. cancelling a non-confirmed booking)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The payment collaborator declined the charge
    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    /// Durable storage is unreachable; the operation may be retried
    #[error("Repository unavailable: {0}")]
    RepositoryUnavailable(String),
}

impl BookingError {
    /// Whether this error is transient and the operation may succeed
    /// if retried with the same input.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RepositoryUnavailable(_))
    }
}

/// Result type for engine operations
pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_repository_errors_are_transient() {
        assert!(BookingError::RepositoryUnavailable("db down".into()).is_transient());
        assert!(!BookingError::SlotAlreadyBooked("taken".into()).is_transient());
        assert!(!BookingError::SlotInPast("gone".into()).is_transient());
        assert!(!BookingError::InvalidPlayerDetails("name".into()).is_transient());
    }
}
