//! The task reconciler state machine.
//!
//! ```text
//!            start(non-empty)               update(last pending)
//!   Idle ─────────────────► ExplicitPending ──────────────────► ImplicitPending
//!    ▲  │                         ▲                                   │
//!    │  └─ start(empty) ──────────┼───────────────────────────────────┤
//!    │                            └──────── start(...) ───────────────┤
//!    └──────────────── reconcile (implicit request sent) ◄────────────┘
//! ```

use std::collections::BTreeMap;

use stagehand_id::TaskId;
use stagehand_model::{Clock, SchedulerDriver, SystemClock, TaskStatus};
use tracing::{debug, info};

use crate::{ReconcileResult, ReconcilerConfig};

/// Tracks which tasks' status the cluster has yet to confirm.
///
/// Not internally synchronized: the control loop owns it.
#[derive(Debug)]
pub struct TaskReconciler<C: Clock = SystemClock> {
    unreconciled: BTreeMap<TaskId, TaskStatus>,
    implicit_done: bool,
    last_request_ms: Option<u64>,
    config: ReconcilerConfig,
    clock: C,
}

impl TaskReconciler<SystemClock> {
    /// Creates a reconciler on the system clock.
    pub fn new(config: ReconcilerConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for TaskReconciler<SystemClock> {
    fn default() -> Self {
        Self::new(ReconcilerConfig::default())
    }
}

impl<C: Clock> TaskReconciler<C> {
    /// Creates a reconciler reading time from `clock`.
    ///
    /// A fresh reconciler has nothing pending and counts as reconciled until
    /// the first `start`.
    pub fn with_clock(config: ReconcilerConfig, clock: C) -> Self {
        Self {
            unreconciled: BTreeMap::new(),
            implicit_done: true,
            last_request_ms: None,
            config,
            clock,
        }
    }

    /// Adds `statuses` to the pending set and re-arms the implicit request.
    ///
    /// A task already pending has its stored status replaced.
    pub fn start(&mut self, statuses: impl IntoIterator<Item = TaskStatus>) {
        for status in statuses {
            self.unreconciled.insert(status.task_id.clone(), status);
        }
        self.implicit_done = false;
        info!(
            pending = self.unreconciled.len(),
            "Starting task reconciliation"
        );
    }

    /// Marks the task reported by `status` as confirmed.
    ///
    /// Tasks that are not pending are ignored.
    pub fn update(&mut self, status: &TaskStatus) {
        if self.unreconciled.remove(&status.task_id).is_some() {
            debug!(
                task_id = %status.task_id,
                state = %status.state,
                remaining = self.unreconciled.len(),
                "Task reconciled"
            );
        }
    }

    /// Sends whichever status request is due.
    ///
    /// With tasks pending, sends an explicit request for exactly those tasks
    /// unless the previous one went out less than the minimum interval ago.
    /// With nothing pending, sends the implicit request once. Otherwise does
    /// nothing. A failed request leaves the state untouched.
    pub fn reconcile<D>(&mut self, driver: &mut D) -> ReconcileResult<()>
    where
        D: SchedulerDriver + ?Sized,
    {
        if !self.unreconciled.is_empty() {
            let now = self.clock.now_millis();
            if let Some(last) = self.last_request_ms {
                let elapsed = now.saturating_sub(last);
                if u128::from(elapsed) < self.config.min_interval.as_millis() {
                    debug!(
                        elapsed_ms = elapsed,
                        pending = self.unreconciled.len(),
                        "Skipping explicit reconciliation, too soon after last request"
                    );
                    return Ok(());
                }
            }

            let statuses: Vec<TaskStatus> = self.unreconciled.values().cloned().collect();
            driver.reconcile_tasks(&statuses)?;
            self.last_request_ms = Some(now);
            info!(tasks = statuses.len(), "Requested explicit reconciliation");
        } else if !self.implicit_done {
            driver.reconcile_tasks(&[])?;
            self.implicit_done = true;
            info!("Requested implicit reconciliation");
        }

        Ok(())
    }

    /// Returns true when nothing is pending and the implicit request has
    /// been sent.
    pub fn is_reconciled(&self) -> bool {
        self.unreconciled.is_empty() && self.implicit_done
    }

    /// Abandons reconciliation without contacting the cluster.
    pub fn force_complete(&mut self) {
        info!(
            abandoned = self.unreconciled.len(),
            "Forcing reconciliation complete"
        );
        self.unreconciled.clear();
        self.implicit_done = true;
    }

    /// Task ids still awaiting confirmation, in sorted order.
    pub fn remaining(&self) -> Vec<TaskId> {
        self.unreconciled.keys().cloned().collect()
    }

    /// Returns true once the implicit request has gone out since the last
    /// `start`.
    pub fn is_implicit_done(&self) -> bool {
        self.implicit_done
    }
}
