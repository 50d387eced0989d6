use crate::models::{Edition, RawResponse, TrackerType, VariantMatcher};
use crate::utils::error::ClassifyError;

/// Decides from one fetched page whether the watched edition can be bought.
///
/// Implementations are pure. `Ok(false)` covers every "nothing to buy" case,
/// including an empty result list. `Err` means the page no longer looks the
/// way the tracker expects.
pub trait AvailabilityTracker: Send + Sync {
    /// Plugin metadata
    fn name(&self) -> &str;
    fn tracker_type(&self) -> TrackerType;
    fn description(&self) -> &str;

    /// True if any candidate matching `edition` is purchasable.
    fn classify(
        &self,
        response: &RawResponse,
        variant: &VariantMatcher,
        edition: Edition,
    ) -> Result<bool, ClassifyError>;
}
