use scraper::Html;

use super::{contains, require, selector, text_of};
use crate::models::{Edition, RawResponse, TrackerType, VariantMatcher};
use crate::plugins::traits::AvailabilityTracker;
use crate::utils::error::ClassifyError;

/// MediaMarkt category listing (HTML). Stock is published as schema.org
/// availability metadata on each product.
pub struct MediamarktTracker;

impl MediamarktTracker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MediamarktTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AvailabilityTracker for MediamarktTracker {
    fn name(&self) -> &str {
        "MediaMarkt"
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::Mediamarkt
    }

    fn description(&self) -> &str {
        "Looks for InStock availability metadata on matching products"
    }

    fn classify(
        &self,
        response: &RawResponse,
        variant: &VariantMatcher,
        edition: Edition,
    ) -> Result<bool, ClassifyError> {
        let document = Html::parse_document(&response.body);
        let list = require(document.root_element(), "ul.products-list")?;
        let wrappers = selector("div.product-wrapper")?;
        let contents = selector("div.content")?;

        for product in list.select(&wrappers) {
            let Some(content) = product.select(&contents).next() else {
                tracing::debug!("MediaMarkt product without content block, skipping");
                continue;
            };

            let title = text_of(require(content, "h2")?);
            if variant.matches(&title, edition)
                && contains(product, r#"meta[itemprop="availability"][content="InStock"]"#)?
            {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
