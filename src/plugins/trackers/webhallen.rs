use serde::Deserialize;

use crate::models::{Edition, RawResponse, TrackerType, VariantMatcher};
use crate::plugins::traits::AvailabilityTracker;
use crate::utils::error::ClassifyError;

/// Status code Webhallen attaches to products that cannot be ordered yet.
const NOT_ORDERABLE_STATUS: i64 = 9;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    total_product_count: i64,
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Product {
    name: String,
    stock: Stock,
    status_codes: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct Stock {
    web: i64,
}

/// Webhallen search API (JSON).
pub struct WebhallenTracker;

impl WebhallenTracker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WebhallenTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AvailabilityTracker for WebhallenTracker {
    fn name(&self) -> &str {
        "Webhallen"
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::Webhallen
    }

    fn description(&self) -> &str {
        "Reads the category search API and checks web stock per product"
    }

    fn classify(
        &self,
        response: &RawResponse,
        variant: &VariantMatcher,
        edition: Edition,
    ) -> Result<bool, ClassifyError> {
        if response.status != 200 {
            return Ok(false);
        }

        let data: SearchResponse = response.json()?;
        if data.total_product_count <= 0 {
            return Ok(false);
        }

        Ok(data.products.iter().any(|product| {
            variant.matches(&product.name, edition)
                && product.stock.web > 0
                && !product.status_codes.contains(&NOT_ORDERABLE_STATUS)
        }))
    }
}
