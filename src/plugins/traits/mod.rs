pub mod tracker;
pub mod notifier;

pub use tracker::AvailabilityTracker;
pub use notifier::{Notifier, Receipt};

#[cfg(test)]
pub use notifier::MockNotifier;
