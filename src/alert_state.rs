use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::ScanResult;

/// A source went from not-alerted to available.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertEvent {
    pub source: String,
    pub detected_at: DateTime<Utc>,
}

/// Remembers which sources have already been announced as in stock.
///
/// A source is announced once per availability window: repeated `Available`
/// results are suppressed until an `Unavailable` result clears it. `Failed`
/// results leave the state alone, so a flaky page neither re-announces nor
/// forgets a restock.
#[derive(Debug, Clone, Default)]
pub struct AlertState {
    alerted: HashMap<String, DateTime<Utc>>,
}

impl AlertState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, source: &str, result: &ScanResult) -> Option<AlertEvent> {
        self.observe_at(source, result, Utc::now())
    }

    pub fn observe_at(&mut self, source: &str, result: &ScanResult, now: DateTime<Utc>) -> Option<AlertEvent> {
        match result {
            ScanResult::Available => {
                if self.alerted.contains_key(source) {
                    return None;
                }
                self.alerted.insert(source.to_string(), now);
                Some(AlertEvent {
                    source: source.to_string(),
                    detected_at: now,
                })
            }
            ScanResult::Unavailable => {
                if self.alerted.remove(source).is_some() {
                    tracing::debug!("{} is out of stock again", source);
                }
                None
            }
            ScanResult::Failed(_) => None,
        }
    }

    /// Forgets a source so its next `Available` result raises a fresh event.
    pub fn clear(&mut self, source: &str) {
        self.alerted.remove(source);
    }

    pub fn is_alerted(&self, source: &str) -> bool {
        self.alerted.contains_key(source)
    }

    pub fn alerted_at(&self, source: &str) -> Option<DateTime<Utc>> {
        self.alerted.get(source).copied()
    }

    pub fn alerted_count(&self) -> usize {
        self.alerted.len()
    }
}
