//! Configuration for the scheduler service.

use std::time::Duration;

use anyhow::{Context, Result};
use stagehand_id::FrameworkId;
use stagehand_reconcile::{ReconcilerConfig, DEFAULT_RECONCILE_INTERVAL};

/// Scheduler service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Framework id used when registering with the cluster.
    pub framework_id: FrameworkId,

    /// Minimum time between explicit reconciliation requests.
    pub reconcile_min_interval: Duration,

    /// Interval between control loop ticks.
    pub tick_interval: Duration,

    /// Capacity of the cluster event channel.
    pub event_buffer: usize,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            framework_id: FrameworkId::new("stagehand"),
            reconcile_min_interval: DEFAULT_RECONCILE_INTERVAL,
            tick_interval: Duration::from_secs(1),
            event_buffer: 256,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let framework_id = match lookup("STAGEHAND_FRAMEWORK_ID") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid STAGEHAND_FRAMEWORK_ID {raw:?}"))?,
            None => defaults.framework_id,
        };

        let reconcile_min_interval = lookup("STAGEHAND_RECONCILE_MIN_INTERVAL_MS")
            .map(|raw| parse_millis("STAGEHAND_RECONCILE_MIN_INTERVAL_MS", &raw))
            .transpose()?
            .unwrap_or(defaults.reconcile_min_interval);

        let tick_interval = lookup("STAGEHAND_TICK_INTERVAL_MS")
            .map(|raw| parse_millis("STAGEHAND_TICK_INTERVAL_MS", &raw))
            .transpose()?
            .unwrap_or(defaults.tick_interval);
        if tick_interval.is_zero() {
            anyhow::bail!("STAGEHAND_TICK_INTERVAL_MS must be positive");
        }

        let event_buffer = match lookup("STAGEHAND_EVENT_BUFFER") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| format!("invalid STAGEHAND_EVENT_BUFFER {raw:?}"))?,
            None => defaults.event_buffer,
        };

        let log_level = lookup("STAGEHAND_LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Self {
            framework_id,
            reconcile_min_interval,
            tick_interval,
            event_buffer,
            log_level,
        })
    }

    pub fn reconciler_config(&self) -> ReconcilerConfig {
        ReconcilerConfig {
            min_interval: self.reconcile_min_interval,
        }
    }
}

fn parse_millis(key: &str, raw: &str) -> Result<Duration> {
    raw.parse::<u64>()
        .map(Duration::from_millis)
        .with_context(|| format!("invalid {key} {raw:?}"))
}
