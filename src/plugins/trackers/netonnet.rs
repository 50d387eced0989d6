use scraper::Html;

use super::{contains, require, selector, text_of};
use crate::models::{Edition, RawResponse, TrackerType, VariantMatcher};
use crate::plugins::traits::AvailabilityTracker;
use crate::utils::error::ClassifyError;

/// NetOnNet category listing (HTML). A green check icon in the warehouse
/// stock box marks products that can be ordered online.
pub struct NetonnetTracker;

impl NetonnetTracker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NetonnetTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AvailabilityTracker for NetonnetTracker {
    fn name(&self) -> &str {
        "NetOnNet"
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::Netonnet
    }

    fn description(&self) -> &str {
        "Checks the warehouse stock indicator on matching product items"
    }

    fn classify(
        &self,
        response: &RawResponse,
        variant: &VariantMatcher,
        edition: Edition,
    ) -> Result<bool, ClassifyError> {
        let document = Html::parse_document(&response.body);
        let items = selector("div.cProductItem")?;

        for item in document.select(&items) {
            let header = require(item, "div.smallHeader")?;
            let title = text_of(require(header, "div.shortText")?);
            if !variant.matches(&title, edition) {
                continue;
            }

            let stock = require(item, "div.warehouseStockStatusContainer")?;
            if contains(stock, "i.check")? {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
