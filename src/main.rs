use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use restock_watcher::config::{AppConfig, LoggingConfig, MetricsConfig};
use restock_watcher::models::build_sources;
use restock_watcher::plugins::PluginManager;
use restock_watcher::{AvailabilityEngine, HttpFetcher, ScanScheduler};

#[derive(Parser, Debug)]
#[command(name = "restock-watcher", version, about = "Announces when watched products come back in stock")]
struct Cli {
    /// Read this file instead of the layered config/ directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a single priming cycle, print its summary and exit
    #[arg(long)]
    once: bool,

    /// Print the configured sources and exit
    #[arg(long)]
    list_sources: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::from_env(),
    }
    .context("Failed to load configuration")?;

    let _guard = init_tracing(&config.logging)?;

    info!("Starting Restock Watcher...");

    let plugins = PluginManager::with_default_trackers();
    let sources = build_sources(&config.sources, &plugins)?;

    if cli.list_sources {
        for source in &sources {
            println!(
                "{:<40} {:<12} {:<8} {:<4} {}",
                source.name,
                source.tracker_type().to_string(),
                source.edition.to_string(),
                reqwest::Method::from(source.method).to_string(),
                source.endpoint
            );
        }
        return Ok(());
    }

    if config.metrics.enabled {
        init_metrics(&config.metrics)?;
    }

    let fetcher = HttpFetcher::new(&config.scraper)?;
    let engine = AvailabilityEngine::new(Arc::new(fetcher));
    let notifier = plugins.notifier_from_config(&config.notifications);
    let mut scheduler = ScanScheduler::new(sources, engine, notifier, config.scheduler.clone());

    if cli.once {
        let summary = scheduler.run_cycle().await;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    tokio::select! {
        _ = scheduler.run() => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutting down...");
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("restock_watcher=info"))?;

    let (file_layer, guard) = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &logging.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}

fn init_metrics(metrics: &MetricsConfig) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], metrics.port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("Failed to install Prometheus exporter")?;
    info!("Serving Prometheus metrics on {}", addr);
    Ok(())
}
