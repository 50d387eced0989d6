use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utils::error::NotifyError;

/// Identifier handed back by the channel for a delivered message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Receipt {
    pub id: String,
}

impl Receipt {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Outbound channel for restock announcements and operator reports.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// Public announcement that a source has stock.
    async fn publish(&self, message: &str) -> Result<Receipt, NotifyError>;

    /// Private message to whoever runs the watcher.
    async fn notify_operator(&self, message: &str) -> Result<Receipt, NotifyError>;
}
