use serde::Deserialize;
use serde_json::Value;

use crate::models::{Edition, RawResponse, TrackerType, VariantMatcher};
use crate::plugins::traits::AvailabilityTracker;
use crate::utils::error::ClassifyError;

#[derive(Debug, Deserialize)]
struct ProductsResponse {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    name: String,
    stock: Stock,
}

#[derive(Debug, Deserialize)]
struct Stock {
    quantity: Value,
}

/// Spel och Sånt product feed (JSON, requested with a POSTed category form).
pub struct SpelochsantTracker;

impl SpelochsantTracker {
    pub fn new() -> Self {
        Self
    }

    /// The feed sends quantities as numbers or numeric strings.
    fn quantity(value: &Value) -> Result<i64, ClassifyError> {
        let invalid = || ClassifyError::InvalidValue {
            field: "stock.quantity".to_string(),
            value: value.to_string(),
        };

        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).ok_or_else(invalid),
            Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

impl Default for SpelochsantTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AvailabilityTracker for SpelochsantTracker {
    fn name(&self) -> &str {
        "Spel och Sånt"
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::Spelochsant
    }

    fn description(&self) -> &str {
        "Checks the stock quantity of matching products in the category feed"
    }

    fn classify(
        &self,
        response: &RawResponse,
        variant: &VariantMatcher,
        edition: Edition,
    ) -> Result<bool, ClassifyError> {
        let data: ProductsResponse = response.json()?;

        for product in &data.products {
            if variant.matches(&product.name, edition) && Self::quantity(&product.stock.quantity)? > 0 {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
