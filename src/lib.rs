pub mod alert_state;
pub mod availability;
pub mod config;
pub mod error_reporter;
pub mod fetcher;
pub mod models;
pub mod plugins;
pub mod scheduler;
pub mod utils;

// Re-export commonly used types
pub use alert_state::{AlertEvent, AlertState};
pub use availability::AvailabilityEngine;
pub use config::AppConfig;
pub use error_reporter::{ErrorReporter, ReportOutcome};
pub use fetcher::{Fetcher, HttpFetcher};
pub use models::{ScanResult, SourceDescriptor};
pub use scheduler::{CycleSummary, ScanScheduler};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
