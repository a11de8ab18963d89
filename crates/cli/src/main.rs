mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snapstage_core::{
    create_event_log, load_config, load_default_config, sync_command, validate_config,
    EventSink, FanoutSink, Organizer, RunReport, TracingSink,
};

use cli::Cli;

/// Placeholder shown in the sync suggestion when no target is configured.
const TARGET_PLACEHOLDER: &str = "<target>";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    if cli.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None => load_default_config().context("Failed to load configuration")?,
    };
    cli.apply_to(&mut config);

    validate_config(&config).context("Configuration validation failed")?;

    info!("Scan root: {:?}", config.scan.root);
    info!("Collection root: {:?}", config.collect.root);

    // Event sinks
    let mut sink = FanoutSink::new().with(Arc::new(TracingSink));
    let mut log_task = None;
    let mut dropped_events = None;
    if let Some(path) = &config.events.log {
        let (channel_sink, writer) = create_event_log(path, config.events.buffer);
        info!("Writing events to {:?}", writer.path());
        log_task = Some(tokio::spawn(writer.run()));
        dropped_events = Some(channel_sink.dropped_events());
        sink = sink.with(Arc::new(channel_sink));
    }
    let sink: Arc<dyn EventSink> = Arc::new(sink);

    let organizer = Organizer::from_config(&config, sink);
    let result = organizer.run(&config.scan.root).await;

    // Close the event channel so the writer can finish
    drop(organizer);
    if let Some(task) = log_task {
        match task.await {
            Ok(Ok(written)) => info!("Wrote {} events", written),
            Ok(Err(e)) => warn!("Event log failed: {}", e),
            Err(e) => warn!("Event log task failed: {}", e),
        }
    }
    if let Some(dropped) = dropped_events.filter(|d| d.count() > 0) {
        warn!(
            "Event log is incomplete: {} events dropped, raise events.buffer to keep them",
            dropped.count()
        );
    }

    let report = result.context("Run failed")?;
    print_summary(&report);

    let target = config.sync.target.as_deref().unwrap_or(TARGET_PLACEHOLDER);
    println!(
        "Now run '{}' to see the list of files to transfer, then remove '-n' and run again",
        sync_command(&config.collect.root, target)
    );

    Ok(())
}

fn print_summary(report: &RunReport) {
    println!(
        "Scanned {} files: {} pictures, {} without a usable date",
        report.discovery.scanned, report.discovery.matched, report.discovery.unresolved
    );
    println!(
        "Moved {}, already present {}, failed {}, gave up {} ({} retries)",
        report.pool.moved(),
        report.pool.skipped(),
        report.pool.errored(),
        report.pool.exhausted(),
        report.pool.retries
    );
    if !report.is_clean() {
        warn!("Some pictures were not staged; see the log above");
    }
}
