mod cancellation;

pub use cancellation::{compute_refund, CancellationCause};
