//! Task status reconciliation.
//!
//! After a restart or a network partition the scheduler's idea of which tasks
//! are alive may be stale. The cluster is authoritative; reconciliation asks
//! it to resend the status of every task we think we have, then of every task
//! it thinks we have. Key concepts:
//!
//! - **Explicit reconciliation**: asking about specific task ids.
//! - **Implicit reconciliation**: asking with an empty list, which makes the
//!   cluster report every task belonging to the framework.
//! - **Reconciled**: nothing left pending and the implicit request has gone
//!   out.
//!
//! # Invariants
//!
//! - A task leaves the pending set only when the cluster reports on it, or
//!   when an operator forces completion
//! - Explicit requests are never closer together than the configured minimum
//!   interval, however often `reconcile` is polled
//! - Every `start` is followed by exactly one implicit request before the
//!   reconciler reports itself reconciled again

mod reconciler;

use std::time::Duration;

use stagehand_model::DriverError;
use thiserror::Error;

pub use reconciler::TaskReconciler;

/// Reconciliation errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReconcileError {
    /// The status request could not be delivered; it is retried on the next
    /// `reconcile` call.
    #[error("transport failure: {0}")]
    Transport(#[from] DriverError),
}

/// Result type for reconciliation.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Reconciler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Minimum time between two explicit status requests.
    pub min_interval: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_RECONCILE_INTERVAL,
        }
    }
}

/// Default minimum interval between explicit requests.
pub const DEFAULT_RECONCILE_INTERVAL: Duration = Duration::from_secs(30);
