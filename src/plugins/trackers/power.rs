use serde::Deserialize;

use crate::models::{Edition, RawResponse, TrackerType, VariantMatcher};
use crate::plugins::traits::AvailabilityTracker;
use crate::utils::error::ClassifyError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductList {
    total_product_count: i64,
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Product {
    title: String,
    stock_count: i64,
    #[serde(default)]
    can_add_to_cart: bool,
}

/// Power product list API (JSON).
pub struct PowerTracker;

impl PowerTracker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PowerTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AvailabilityTracker for PowerTracker {
    fn name(&self) -> &str {
        "Power"
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::Power
    }

    fn description(&self) -> &str {
        "Requires stock and an enabled add-to-cart flag on a matching product"
    }

    fn classify(
        &self,
        response: &RawResponse,
        variant: &VariantMatcher,
        edition: Edition,
    ) -> Result<bool, ClassifyError> {
        let data: ProductList = response.json()?;
        if data.total_product_count <= 0 {
            return Ok(false);
        }

        Ok(data.products.iter().any(|product| {
            variant.matches(&product.title, edition) && product.stock_count > 0 && product.can_add_to_cart
        }))
    }
}
