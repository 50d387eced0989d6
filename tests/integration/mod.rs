// Integration tests for Restock Watcher
// These tests drive real HTTP fetching and Discord delivery against local mock servers

pub mod notifier_tests;
pub mod scan_cycle_tests;

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use restock_watcher::{
    AvailabilityEngine, HttpFetcher, ScanScheduler,
    config::{DiscordConfig, NotificationsConfig, NotifierBackend, SchedulerConfig, ScraperConfig},
    models::{SourceConfig, build_sources},
    plugins::{Notifier, PluginManager, Receipt},
    utils::error::NotifyError,
};
use wiremock::MockServer;

/// Scraper settings with a short timeout so failure cases finish quickly
pub fn get_test_scraper_config() -> ScraperConfig {
    ScraperConfig {
        request_timeout: 2,
        user_agent: "RestockWatcher-Test/1.0".to_string(),
    }
}

pub fn get_test_scheduler_config() -> SchedulerConfig {
    SchedulerConfig {
        scan_delay_secs: 0,
        max_concurrent_checks: 2,
    }
}

/// Discord settings pointing both webhooks at the mock server
pub fn get_test_discord_config(server: &MockServer) -> NotificationsConfig {
    NotificationsConfig {
        backend: NotifierBackend::Discord,
        discord: DiscordConfig {
            webhook_url: Some(format!("{}/api/webhooks/1/public", server.uri())),
            operator_webhook_url: Some(format!("{}/api/webhooks/2/operator", server.uri())),
            username: "Restock Test Bot".to_string(),
            ..DiscordConfig::default()
        },
        ..NotificationsConfig::default()
    }
}

/// Parses `[[sources]]` entries the same way the shipped configuration does
pub fn parse_sources(toml: &str) -> Vec<SourceConfig> {
    #[derive(serde::Deserialize)]
    struct Sources {
        sources: Vec<SourceConfig>,
    }

    let parsed: Sources = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()
        .and_then(|c| c.try_deserialize())
        .expect("valid source table");
    parsed.sources
}

/// Builds a scheduler that fetches over HTTP and publishes through `notifier`
pub fn create_test_scheduler(sources: &[SourceConfig], notifier: Arc<dyn Notifier>) -> ScanScheduler {
    let plugins = PluginManager::with_default_trackers();
    let sources = build_sources(sources, &plugins).expect("sources resolve");
    let fetcher = HttpFetcher::new(&get_test_scraper_config()).expect("http client");

    ScanScheduler::new(
        sources,
        AvailabilityEngine::new(Arc::new(fetcher)),
        notifier,
        get_test_scheduler_config(),
    )
}

/// Webhallen search API body listing a single product
pub fn webhallen_body(name: &str, web_stock: i64) -> serde_json::Value {
    serde_json::json!({
        "totalProductCount": 1,
        "products": [{
            "name": name,
            "stock": { "web": web_stock },
            "statusCodes": []
        }]
    })
}

/// Collects every message instead of delivering it
#[derive(Default)]
pub struct RecordingNotifier {
    published: Mutex<Vec<String>>,
    operator: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }

    pub fn operator(&self) -> Vec<String> {
        self.operator.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn publish(&self, message: &str) -> Result<Receipt, NotifyError> {
        let mut published = self.published.lock().unwrap();
        published.push(message.to_string());
        Ok(Receipt::new(format!("post-{}", published.len())))
    }

    async fn notify_operator(&self, message: &str) -> Result<Receipt, NotifyError> {
        let mut operator = self.operator.lock().unwrap();
        operator.push(message.to_string());
        Ok(Receipt::new(format!("dm-{}", operator.len())))
    }
}
