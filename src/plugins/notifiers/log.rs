use async_trait::async_trait;
use uuid::Uuid;

use crate::plugins::traits::{Notifier, Receipt};
use crate::utils::error::NotifyError;

/// Log-only mode, used when no outbound channel is configured.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }

    fn receipt() -> Receipt {
        Receipt::new(format!("log-{}", Uuid::new_v4()))
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn publish(&self, message: &str) -> Result<Receipt, NotifyError> {
        tracing::info!("Not really publishing: {}", message);
        Ok(Self::receipt())
    }

    async fn notify_operator(&self, message: &str) -> Result<Receipt, NotifyError> {
        tracing::warn!("Operator report (log-only): {}", message);
        Ok(Self::receipt())
    }
}
