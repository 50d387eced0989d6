use scraper::{ElementRef, Html};

use super::{require, selector, text_of};
use crate::models::{Edition, RawResponse, TrackerType, VariantMatcher};
use crate::plugins::traits::AvailabilityTracker;
use crate::utils::error::ClassifyError;

const BUY_BUTTON_ID: &str = "buy_button";
const BUY_LABEL: &str = "köp";

/// Inet category listing (HTML). Each product card has a buy button whose
/// label reads "Köp" when the product can be ordered.
pub struct InetTracker;

impl InetTracker {
    pub fn new() -> Self {
        Self
    }

    /// Product title for a buy button, taken from the card link's aria-label.
    fn card_title(button: ElementRef<'_>) -> Result<String, ClassifyError> {
        let card = button
            .ancestors()
            .nth(2)
            .and_then(ElementRef::wrap)
            .ok_or_else(|| ClassifyError::missing("product card around button.btn"))?;
        let link = require(card, "a")?;

        Ok(link.value().attr("aria-label").unwrap_or_default().to_string())
    }
}

impl Default for InetTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AvailabilityTracker for InetTracker {
    fn name(&self) -> &str {
        "Inet"
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::Inet
    }

    fn description(&self) -> &str {
        "Looks for an enabled \"Köp\" button on matching product cards"
    }

    fn classify(
        &self,
        response: &RawResponse,
        variant: &VariantMatcher,
        edition: Edition,
    ) -> Result<bool, ClassifyError> {
        let document = Html::parse_document(&response.body);
        let buttons = selector("button.btn")?;

        for button in document.select(&buttons) {
            let is_buy_button = button
                .value()
                .attr("data-test-id")
                .is_some_and(|id| id.contains(BUY_BUTTON_ID));
            if !is_buy_button {
                continue;
            }

            let title = Self::card_title(button)?;
            if variant.matches(&title, edition) && text_of(button).trim().to_lowercase() == BUY_LABEL {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
