use std::collections::HashMap;
use std::sync::Arc;

use super::notifiers::{DiscordNotifier, EmailNotifier, LogNotifier};
use super::traits::{AvailabilityTracker, Notifier};
use super::trackers::{
    AmazonTracker, InetTracker, MaxgamingTracker, MediamarktTracker, NetonnetTracker, PowerTracker,
    SpelochsantTracker, WebhallenTracker,
};
use crate::config::{NotifierBackend, NotificationsConfig};
use crate::models::TrackerType;

pub type TrackerPluginArc = Arc<dyn AvailabilityTracker>;
pub type NotifierPluginArc = Arc<dyn Notifier>;

/// Registry of retailer trackers, plus construction of the configured notifier.
#[derive(Clone, Default)]
pub struct PluginManager {
    trackers: HashMap<TrackerType, TrackerPluginArc>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self {
            trackers: HashMap::new(),
        }
    }

    /// Registry with every built-in retailer tracker.
    pub fn with_default_trackers() -> Self {
        let mut manager = Self::new();
        manager.register_tracker(Arc::new(WebhallenTracker::new()));
        manager.register_tracker(Arc::new(InetTracker::new()));
        manager.register_tracker(Arc::new(NetonnetTracker::new()));
        manager.register_tracker(Arc::new(PowerTracker::new()));
        manager.register_tracker(Arc::new(MaxgamingTracker::new()));
        manager.register_tracker(Arc::new(MediamarktTracker::new()));
        manager.register_tracker(Arc::new(SpelochsantTracker::new()));
        manager.register_tracker(Arc::new(AmazonTracker::new()));
        manager
    }

    /// Register a tracker plugin, replacing any previous one of the same type
    pub fn register_tracker(&mut self, plugin: TrackerPluginArc) {
        let tracker_type = plugin.tracker_type();
        if self.trackers.insert(tracker_type, plugin).is_some() {
            tracing::debug!("Replaced tracker plugin: {}", tracker_type);
        }
    }

    pub fn tracker(&self, tracker_type: TrackerType) -> Option<TrackerPluginArc> {
        self.trackers.get(&tracker_type).cloned()
    }

    pub fn has_tracker(&self, tracker_type: TrackerType) -> bool {
        self.trackers.contains_key(&tracker_type)
    }

    /// List all available tracker types
    pub fn list_tracker_types(&self) -> Vec<TrackerType> {
        let mut types: Vec<_> = self.trackers.keys().copied().collect();
        types.sort_by_key(|t| t.as_str());
        types
    }

    /// Builds the configured notifier. Missing or broken credentials fall back
    /// to log-only mode so scanning keeps running.
    pub fn notifier_from_config(&self, config: &NotificationsConfig) -> NotifierPluginArc {
        match config.backend {
            NotifierBackend::Discord => match DiscordNotifier::from_config(&config.discord) {
                Ok(notifier) => {
                    tracing::info!("Publishing restocks to Discord");
                    Arc::new(notifier)
                }
                Err(e) => {
                    tracing::warn!("Discord notifier unavailable ({}), running in log-only mode", e);
                    Arc::new(LogNotifier::new())
                }
            },
            NotifierBackend::Email => match EmailNotifier::from_config(&config.smtp) {
                Ok(notifier) => {
                    tracing::info!("Publishing restocks by email via {}", config.smtp.host);
                    Arc::new(notifier)
                }
                Err(e) => {
                    tracing::warn!("Email notifier unavailable ({}), running in log-only mode", e);
                    Arc::new(LogNotifier::new())
                }
            },
            NotifierBackend::Log => {
                tracing::info!("Notifier backend is log-only");
                Arc::new(LogNotifier::new())
            }
        }
    }
}
