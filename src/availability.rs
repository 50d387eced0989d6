use std::sync::Arc;

use crate::fetcher::Fetcher;
use crate::models::{ScanFailure, ScanResult, SourceDescriptor};

/// Fetches a source and asks its tracker whether the product is buyable.
///
/// Never returns an error: transport and classification problems both come
/// back as [`ScanResult::Failed`] so one broken retailer cannot stall a cycle.
#[derive(Clone)]
pub struct AvailabilityEngine {
    fetcher: Arc<dyn Fetcher>,
}

impl AvailabilityEngine {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn evaluate(&self, source: &SourceDescriptor) -> ScanResult {
        let response = match self.fetcher.fetch(source).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Fetching {} failed: {}", source.name, e);
                return ScanResult::Failed(ScanFailure::transport(&e));
            }
        };

        match source.classify(&response) {
            Ok(available) => {
                tracing::debug!("{} available: {}", source.name, available);
                ScanResult::from_available(available)
            }
            Err(e) => {
                tracing::warn!("Classifying {} failed: {}", source.name, e);
                ScanResult::Failed(ScanFailure::classification(&e))
            }
        }
    }
}
