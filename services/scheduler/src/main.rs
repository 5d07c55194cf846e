//! stagehand scheduler
//!
//! Runs the scheduler control loop against a dry-run driver. Cluster events
//! are read from stdin as JSON lines, one [`ClusterEvent`] per line, so a
//! recorded event stream can be replayed through the loop.

use anyhow::Result;
use stagehand_scheduler::{ClusterEvent, Config, DryRunDriver, Scheduler};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!(
        framework_id = %config.framework_id,
        reconcile_min_interval_ms =
            u64::try_from(config.reconcile_min_interval.as_millis()).unwrap_or(u64::MAX),
        tick_interval_ms = u64::try_from(config.tick_interval.as_millis()).unwrap_or(u64::MAX),
        "Starting stagehand scheduler"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (events_tx, events_rx) = mpsc::channel(config.event_buffer);

    let scheduler = Scheduler::new(DryRunDriver::new(), &config);
    let mut scheduler_handle = tokio::spawn(scheduler.run(events_rx, shutdown_rx));

    events_tx
        .send(ClusterEvent::Registered {
            framework_id: config.framework_id.clone(),
            known_tasks: Vec::new(),
        })
        .await?;

    let reader_handle = tokio::spawn(read_events(events_tx));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        result = &mut scheduler_handle => {
            if let Err(e) = result {
                error!(error = %e, "Scheduler task panicked");
            }
            return Ok(());
        }
    }

    let _ = shutdown_tx.send(true);
    reader_handle.abort();

    match scheduler_handle.await {
        Ok(scheduler) => info!(
            driver_calls = scheduler.driver().calls(),
            "Scheduler shutdown complete"
        ),
        Err(e) => error!(error = %e, "Scheduler task panicked"),
    }
    Ok(())
}

/// Forwards JSON-line events from stdin until EOF.
async fn read_events(events: mpsc::Sender<ClusterEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to read event");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ClusterEvent>(&line) {
            Ok(event) => {
                if events.send(event).await.is_err() {
                    break;
                }
            }
            Err(e) => warn!(error = %e, "Ignoring malformed event"),
        }
    }
    info!("Event input closed");
}
