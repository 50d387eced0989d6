use chrono::{DateTime, Timelike, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::plugins::traits::Notifier;

/// Label used when a failure is not tied to a single source.
const GLOBAL_SCOPE: &str = "restock-watcher";

/// Identity of a reported failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorSignature {
    pub source: Option<String>,
    pub cause: String,
}

impl ErrorSignature {
    pub fn new(source: Option<&str>, cause: &str) -> Self {
        Self {
            source: source.map(str::to_string),
            cause: cause.to_string(),
        }
    }
}

/// Failures the operator was told about during the current UTC clock hour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMemo {
    reported: HashMap<ErrorSignature, DateTime<Utc>>,
}

impl ErrorMemo {
    /// True when `signature` was already reported within the same UTC clock hour as `now`.
    pub fn suppresses(&self, signature: &ErrorSignature, now: DateTime<Utc>) -> bool {
        self.reported
            .get(signature)
            .is_some_and(|reported_at| same_hour(*reported_at, now))
    }

    /// Records a report, dropping entries from earlier hours.
    pub fn record(&mut self, signature: ErrorSignature, now: DateTime<Utc>) {
        self.reported.retain(|_, reported_at| same_hour(*reported_at, now));
        self.reported.insert(signature, now);
    }

    pub fn reported_at(&self, signature: &ErrorSignature) -> Option<DateTime<Utc>> {
        self.reported.get(signature).copied()
    }

    pub fn len(&self) -> usize {
        self.reported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }
}

fn same_hour(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive() && a.hour() == b.hour()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Delivered on the first attempt
    Sent,
    /// First attempt failed, the retry went through
    Retried,
    /// Same failure already reported this hour
    Suppressed,
    /// Both attempts failed; logged only
    Failed,
}

/// Tells the operator about scan failures without flooding them.
pub struct ErrorReporter {
    notifier: Arc<dyn Notifier>,
    memo: ErrorMemo,
}

impl ErrorReporter {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            memo: ErrorMemo::default(),
        }
    }

    pub fn memo(&self) -> &ErrorMemo {
        &self.memo
    }

    pub async fn report(&mut self, source: Option<&str>, cause: &str) -> ReportOutcome {
        self.report_at(source, cause, Utc::now()).await
    }

    pub async fn report_at(&mut self, source: Option<&str>, cause: &str, now: DateTime<Utc>) -> ReportOutcome {
        let signature = ErrorSignature::new(source, cause);

        if self.memo.suppresses(&signature, now) {
            tracing::debug!("Suppressing repeated error report for {}", source.unwrap_or(GLOBAL_SCOPE));
            return ReportOutcome::Suppressed;
        }

        // Recorded before sending: an undeliverable report is not retried next cycle.
        self.memo.record(signature, now);

        let message = format!("Error for {}: {}", source.unwrap_or(GLOBAL_SCOPE), cause);
        let first_error = match self.notifier.notify_operator(&message).await {
            Ok(receipt) => {
                tracing::info!("Reported error to operator (receipt {})", receipt.id);
                return ReportOutcome::Sent;
            }
            Err(e) => e,
        };

        tracing::warn!("Operator report failed, retrying once: {}", first_error);
        let retry = format!(
            "Errors from {}: delivery failed ({}) while reporting: {}",
            GLOBAL_SCOPE, first_error, message
        );
        match self.notifier.notify_operator(&retry).await {
            Ok(receipt) => {
                tracing::info!("Reported error to operator on retry (receipt {})", receipt.id);
                ReportOutcome::Retried
            }
            Err(e) => {
                tracing::error!("Giving up on operator report: {}", e);
                ReportOutcome::Failed
            }
        }
    }
}
