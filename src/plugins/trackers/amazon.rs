use scraper::Html;

use super::{contains, selector};
use crate::models::{Edition, RawResponse, TrackerType, VariantMatcher};
use crate::plugins::traits::AvailabilityTracker;
use crate::utils::error::ClassifyError;

const SWATCH_SELECTOR: &str = "li.swatchSelect";

/// Amazon product detail page (HTML).
///
/// Both editions live on one page behind a swatch picker, so the variant is
/// identified by the selected swatch id rather than by title.
pub struct AmazonTracker;

impl AmazonTracker {
    pub fn new() -> Self {
        Self
    }

    fn swatch_id(edition: Edition) -> &'static str {
        match edition {
            Edition::Digital => "edition_0",
            Edition::Standard => "edition_10",
        }
    }
}

impl Default for AmazonTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AvailabilityTracker for AmazonTracker {
    fn name(&self) -> &str {
        "Amazon"
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::Amazon
    }

    fn description(&self) -> &str {
        "Checks that the selected edition swatch has a buy-now button"
    }

    fn classify(
        &self,
        response: &RawResponse,
        _variant: &VariantMatcher,
        edition: Edition,
    ) -> Result<bool, ClassifyError> {
        let document = Html::parse_document(&response.body);
        let swatches = selector(SWATCH_SELECTOR)?;

        let Some(selected) = document.select(&swatches).next() else {
            tracing::debug!("Amazon page has no selected edition swatch");
            return Ok(false);
        };

        let id = selected
            .value()
            .id()
            .ok_or_else(|| ClassifyError::MissingAttribute {
                selector: SWATCH_SELECTOR.to_string(),
                attribute: "id".to_string(),
            })?;

        if id != Self::swatch_id(edition) {
            return Ok(false);
        }

        contains(document.root_element(), "input#buy-now-button")
    }
}
