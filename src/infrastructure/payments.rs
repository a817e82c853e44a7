//! Payment gateway adapters

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::BookingResult;
use crate::domain::ports::{PaymentGateway, PaymentOutcome};

/// Approves every charge with a generated reference. Stands in for the
/// real processor in development; settlement is external to the engine
/// either way.
#[derive(Debug, Default)]
pub struct AutoApprovePayments;

#[async_trait]
impl PaymentGateway for AutoApprovePayments {
    async fn charge(&self, _booking_id: Uuid, _amount: u32) -> BookingResult<PaymentOutcome> {
        Ok(PaymentOutcome::Approved {
            reference: format!("PAY-{}", Uuid::new_v4().simple()),
        })
    }
}
