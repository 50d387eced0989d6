use scraper::Html;

use super::{require, selector, text_of};
use crate::models::{Edition, RawResponse, TrackerType, VariantMatcher};
use crate::plugins::traits::AvailabilityTracker;
use crate::utils::error::ClassifyError;

const IN_STOCK_LABEL: &str = "i lager";

/// MaxGaming category listing (HTML).
pub struct MaxgamingTracker;

impl MaxgamingTracker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MaxgamingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AvailabilityTracker for MaxgamingTracker {
    fn name(&self) -> &str {
        "MaxGaming"
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::Maxgaming
    }

    fn description(&self) -> &str {
        "Reads the stock status label of matching product tiles"
    }

    fn classify(
        &self,
        response: &RawResponse,
        variant: &VariantMatcher,
        edition: Edition,
    ) -> Result<bool, ClassifyError> {
        let document = Html::parse_document(&response.body);
        let tiles = selector("div.PT_Wrapper")?;

        for tile in document.select(&tiles) {
            let title = text_of(require(tile, "div.PT_Beskr")?);
            if !variant.matches(&title, edition) {
                continue;
            }

            let status = text_of(require(tile, "div.PT_text_Lagerstatus")?);
            if status.trim().to_lowercase() == IN_STOCK_LABEL {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
