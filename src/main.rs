//! Turf booking service
//!
//! Wires the reservation engine with the in-memory adapters, recovers
//! state, and runs the reconciliation loop until shutdown. Reads
//! configuration from a TOML file (~/.config/turf-booking/config.toml).

use std::sync::Arc;

use tracing::{error, info};

use turf_booking::application::{
    start_reconciliation_task, AvailabilityIndex, EngineConfig, ReservationEngine,
};
use turf_booking::config::{default_config_path, AppConfig};
use turf_booking::infrastructure::{
    AutoApprovePayments, InMemoryBookingRepository, StaticFacilityDirectory, StaticWeatherGate,
    SystemClock,
};
use turf_booking::notifications::{create_event_bus, BusNotifier};
use turf_booking::shared::shutdown::ShutdownSignal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("TURF_BOOKING_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting turf booking service...");
    for facility in &app_cfg.facilities {
        info!(id = %facility.id, name = %facility.name, "Managing facility");
    }

    // ── Wire the engine ────────────────────────────────────────
    let availability = Arc::new(AvailabilityIndex::new());
    let repo = Arc::new(InMemoryBookingRepository::new());
    let weather = Arc::new(StaticWeatherGate::always_playable());
    let payments = Arc::new(AutoApprovePayments);
    let facilities = Arc::new(StaticFacilityDirectory::new(app_cfg.facilities.clone()));

    let event_bus = create_event_bus();
    info!("🔔 Event bus initialized for booking notifications");
    let notifier = Arc::new(BusNotifier::new(event_bus.clone()));

    let engine = ReservationEngine::new(
        availability,
        repo,
        weather,
        payments,
        facilities,
        notifier,
        Arc::new(SystemClock),
        EngineConfig::from(&app_cfg.engine),
    );

    // Reconcile anything left behind by a previous run before taking
    // new bookings.
    engine.recover().await?;

    // ── Background tasks & shutdown ────────────────────────────
    let shutdown = ShutdownSignal::with_signal_listener();
    start_reconciliation_task(
        engine.clone(),
        shutdown.clone(),
        app_cfg.engine.reconcile_interval_secs,
    );

    info!("Turf booking service is up");
    shutdown.wait().await;
    info!("✅ Background tasks stopped, goodbye");

    Ok(())
}
