use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::alert_state::AlertState;
use crate::availability::AvailabilityEngine;
use crate::config::SchedulerConfig;
use crate::error_reporter::ErrorReporter;
use crate::models::{ScanResult, SourceDescriptor};
use crate::plugins::traits::Notifier;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CycleSummary {
    pub cycle: u64,
    /// Cycle 0 records state without announcing anything
    pub priming: bool,
    pub checked: usize,
    pub available: usize,
    pub unavailable: usize,
    pub failed: usize,
    pub notified: usize,
    pub elapsed_ms: u64,
}

/// Drives the scan loop. Owns the alert state and the error reporter, so
/// every mutation happens on this task after the cycle's fetches finish.
pub struct ScanScheduler {
    sources: Arc<Vec<SourceDescriptor>>,
    engine: AvailabilityEngine,
    state: AlertState,
    reporter: ErrorReporter,
    notifier: Arc<dyn Notifier>,
    config: SchedulerConfig,
    cycle: u64,
}

impl ScanScheduler {
    pub fn new(
        sources: Vec<SourceDescriptor>,
        engine: AvailabilityEngine,
        notifier: Arc<dyn Notifier>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            sources: Arc::new(sources),
            engine,
            state: AlertState::new(),
            reporter: ErrorReporter::new(Arc::clone(&notifier)),
            notifier,
            config,
            cycle: 0,
        }
    }

    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    pub fn state(&self) -> &AlertState {
        &self.state
    }

    /// Number of cycles completed so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Scans forever, pausing `scan_delay_secs` after each full pass.
    pub async fn run(&mut self) {
        tracing::info!(
            "Scanning {} sources every {}s via {} notifier",
            self.sources.len(),
            self.config.scan_delay_secs,
            self.notifier.name()
        );

        loop {
            let summary = self.run_cycle().await;
            tracing::info!(
                "Cycle {} done in {}ms: {} available, {} unavailable, {} failed, {} notified",
                summary.cycle,
                summary.elapsed_ms,
                summary.available,
                summary.unavailable,
                summary.failed,
                summary.notified
            );
            tokio::time::sleep(self.config.scan_delay()).await;
        }
    }

    pub async fn run_cycle(&mut self) -> CycleSummary {
        let start_time = Instant::now();
        let priming = self.cycle == 0;
        let sources = Arc::clone(&self.sources);
        let engine = &self.engine;

        // Buffered keeps results in source order.
        let results: Vec<ScanResult> = stream::iter(sources.iter())
            .map(|source| engine.evaluate(source))
            .buffered(self.config.max_concurrent_checks.max(1))
            .collect()
            .await;

        let mut summary = CycleSummary {
            cycle: self.cycle,
            priming,
            checked: results.len(),
            ..CycleSummary::default()
        };

        for (source, result) in sources.iter().zip(results) {
            metrics::counter!("restock_checks_total", "outcome" => result.label()).increment(1);

            match &result {
                ScanResult::Available => summary.available += 1,
                ScanResult::Unavailable => summary.unavailable += 1,
                ScanResult::Failed(failure) => {
                    summary.failed += 1;
                    metrics::counter!("restock_scan_failures_total").increment(1);
                    self.reporter
                        .report(Some(source.name.as_str()), &failure.to_string())
                        .await;
                }
            }

            let Some(event) = self.state.observe(&source.name, &result) else {
                continue;
            };

            if priming {
                tracing::info!("{} already in stock at startup, not announcing", event.source);
                continue;
            }

            if self.announce(source).await {
                summary.notified += 1;
            }
        }

        self.cycle += 1;
        summary.elapsed_ms = start_time.elapsed().as_millis() as u64;
        summary
    }

    async fn announce(&mut self, source: &SourceDescriptor) -> bool {
        let message = source.announcement();
        tracing::info!("In stock: {}", source.name);

        match self.notifier.publish(&message).await {
            Ok(receipt) => {
                metrics::counter!("restock_notifications_total").increment(1);
                tracing::info!("Announced {} (receipt {})", source.name, receipt.id);
                true
            }
            Err(e) => {
                tracing::warn!("Announcing {} failed: {}", source.name, e);
                // Next cycle tries again.
                self.state.clear(&source.name);
                self.reporter
                    .report(Some(source.name.as_str()), &format!("publish failed: {}", e))
                    .await;
                false
            }
        }
    }
}
