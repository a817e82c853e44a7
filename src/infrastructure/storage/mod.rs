mod memory;

pub use memory::InMemoryBookingRepository;
