mod outbound;

pub use outbound::{
    Clock, FacilityDirectory, Notifier, PaymentGateway, PaymentOutcome, Playability, WeatherGate,
};
