use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use url::Url;

use crate::models::{Edition, HttpMethod, RawResponse, TrackerType};
use crate::plugins::manager::PluginManager;
use crate::plugins::traits::AvailabilityTracker;
use crate::utils::error::{AppError, ClassifyError, Result};

pub const DEFAULT_PRODUCT_MARKER: &str = "playstation 5";
pub const DEFAULT_DIGITAL_MARKER: &str = "digital";

/// Title heuristic that tells the standard and digital editions apart.
///
/// Matching is case-insensitive substring containment. Retailer copy changes
/// without notice, so the markers are configurable per source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VariantMatcher {
    pub product_marker: String,
    pub digital_marker: String,
}

impl Default for VariantMatcher {
    fn default() -> Self {
        Self {
            product_marker: DEFAULT_PRODUCT_MARKER.to_string(),
            digital_marker: DEFAULT_DIGITAL_MARKER.to_string(),
        }
    }
}

impl VariantMatcher {
    pub fn matches(&self, title: &str, edition: Edition) -> bool {
        let title = title.to_lowercase();
        let is_product = title.contains(&self.product_marker.to_lowercase());
        let is_digital = title.contains(&self.digital_marker.to_lowercase());

        match edition {
            Edition::Standard => is_product && !is_digital,
            Edition::Digital => is_product && is_digital,
        }
    }
}

/// Variant check with the default markers.
pub fn is_valid_variant(title: &str, is_digital: bool) -> bool {
    VariantMatcher::default().matches(title, Edition::from_digital(is_digital))
}

/// One `[[sources]]` entry as read from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub tracker: TrackerType,
    #[serde(default)]
    pub method: HttpMethod,
    pub endpoint: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub form: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub edition: Edition,
    #[serde(default)]
    pub variant: VariantMatcher,
    pub message: String,
    #[serde(default)]
    pub visit_url: Option<String>,
}

/// A fully resolved source: where to fetch, how to decide, what to announce.
#[derive(Clone)]
pub struct SourceDescriptor {
    pub name: String,
    pub method: HttpMethod,
    pub endpoint: Url,
    pub headers: BTreeMap<String, String>,
    pub form: Option<BTreeMap<String, String>>,
    pub edition: Edition,
    pub variant: VariantMatcher,
    pub message: String,
    pub visit_url: Option<Url>,
    tracker: Arc<dyn AvailabilityTracker>,
}

impl std::fmt::Debug for SourceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDescriptor")
            .field("name", &self.name)
            .field("tracker", &self.tracker.tracker_type())
            .field("method", &self.method)
            .field("endpoint", &self.endpoint.as_str())
            .field("edition", &self.edition)
            .finish()
    }
}

impl SourceDescriptor {
    pub fn new(
        name: impl Into<String>,
        tracker: Arc<dyn AvailabilityTracker>,
        endpoint: Url,
        edition: Edition,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            method: HttpMethod::Get,
            endpoint,
            headers: BTreeMap::new(),
            form: None,
            edition,
            variant: VariantMatcher::default(),
            message: message.into(),
            visit_url: None,
            tracker,
        }
    }

    pub fn with_visit_url(mut self, visit_url: Url) -> Self {
        self.visit_url = Some(visit_url);
        self
    }

    pub fn with_form(mut self, form: BTreeMap<String, String>) -> Self {
        self.method = HttpMethod::Post;
        self.form = Some(form);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn from_config(config: &SourceConfig, plugins: &PluginManager) -> Result<Self> {
        let invalid = |message: String| AppError::InvalidSource {
            name: config.name.clone(),
            message,
        };

        if config.name.trim().is_empty() {
            return Err(AppError::Validation("Source name must not be empty".into()));
        }
        if config.message.trim().is_empty() {
            return Err(invalid("message must not be empty".into()));
        }
        if config.method == HttpMethod::Get && config.form.is_some() {
            return Err(invalid("form body is only allowed on POST sources".into()));
        }

        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| invalid(format!("invalid endpoint '{}': {}", config.endpoint, e)))?;
        let visit_url = config
            .visit_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|e| invalid(format!("invalid visit_url '{}': {}", raw, e)))
            })
            .transpose()?;

        let tracker = plugins
            .tracker(config.tracker)
            .ok_or_else(|| AppError::UnknownTracker(config.tracker.to_string()))?;

        Ok(Self {
            name: config.name.clone(),
            method: config.method,
            endpoint,
            headers: config.headers.clone(),
            form: config.form.clone(),
            edition: config.edition,
            variant: config.variant.clone(),
            message: config.message.clone(),
            visit_url,
            tracker,
        })
    }

    pub fn tracker_type(&self) -> TrackerType {
        self.tracker.tracker_type()
    }

    /// The URL shown to people: the visit URL when set, else the endpoint.
    pub fn link(&self) -> &Url {
        self.visit_url.as_ref().unwrap_or(&self.endpoint)
    }

    pub fn announcement(&self) -> String {
        format!("{} {}", self.message, self.link())
    }

    pub fn classify(&self, response: &RawResponse) -> std::result::Result<bool, ClassifyError> {
        self.tracker.classify(response, &self.variant, self.edition)
    }
}

/// Resolves the configured source table, keeping its order.
pub fn build_sources(configs: &[SourceConfig], plugins: &PluginManager) -> Result<Vec<SourceDescriptor>> {
    let mut seen = HashSet::new();
    let mut sources = Vec::with_capacity(configs.len());

    for config in configs {
        if !seen.insert(config.name.as_str()) {
            return Err(AppError::DuplicateSource(config.name.clone()));
        }
        sources.push(SourceDescriptor::from_config(config, plugins)?);
    }

    Ok(sources)
}
