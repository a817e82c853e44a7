//! Background task that reconciles confirmed bookings with reality.
//!
//! Runs in a tokio::spawn loop; each tick completes confirmed bookings
//! whose slot has ended and voids those whose window the weather gate
//! now reports closed.

use tokio::time::Duration;
use tracing::{info, warn};

use crate::application::engine::ReservationEngine;
use crate::shared::shutdown::ShutdownSignal;

/// Start the reconciliation background task.
pub fn start_reconciliation_task(
    engine: ReservationEngine,
    shutdown: ShutdownSignal,
    check_interval_secs: u64,
) {
    tokio::spawn(async move {
        info!(
            check_interval = check_interval_secs,
            "📅 Reconciliation task started"
        );

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = engine.reconcile().await {
                        warn!(error = %e, "Reconciliation sweep error");
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("📅 Reconciliation task shutting down");
                    break;
                }
            }
        }

        info!("📅 Reconciliation task stopped");
    });
}
