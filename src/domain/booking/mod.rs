mod model;
mod repository;

pub use model::{Booking, BookingStatus, PlayerDetails, ALLOWED_TEAM_SIZES};
pub use repository::BookingRepository;
