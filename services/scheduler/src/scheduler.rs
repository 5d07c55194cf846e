//! The scheduler control loop.
//!
//! All cluster callbacks and operator commands arrive as [`ClusterEvent`]s
//! on one channel and are handled serially, so the reconciler, the cleaner
//! and the plan never see concurrent calls. A periodic tick re-runs
//! reconciliation, which throttles itself.

use std::time::Duration;

use stagehand_id::FrameworkId;
use stagehand_model::{Clock, Filters, Offer, SchedulerDriver, SystemClock, TaskStatus};
use stagehand_offer::{
    CleanupReport, OfferAccepter, OfferError, OfferRequirement, ResourceCleaner,
    ResourceCleanerScheduler,
};
use stagehand_plan::{PlanError, PlanManager};
use stagehand_reconcile::{ReconcileError, ReconcileResult, TaskReconciler};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

use crate::config::Config;
use crate::event::{ClusterEvent, OperatorCommand};

/// Failure handling one event.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Offer(#[from] OfferError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("no plan loaded")]
    NoPlan,
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Owns the driver and every piece of per-framework scheduling state.
pub struct Scheduler<D, C: Clock = SystemClock> {
    driver: D,
    framework_id: Option<FrameworkId>,
    reconciler: TaskReconciler<C>,
    cleanup: ResourceCleanerScheduler,
    cleanup_enabled: bool,
    plan: Option<PlanManager>,
    decline_filters: Filters,
    tick_interval: Duration,
}

impl<D: SchedulerDriver> Scheduler<D> {
    /// Creates a scheduler on the system clock.
    pub fn new(driver: D, config: &Config) -> Self {
        Self::with_reconciler(driver, TaskReconciler::new(config.reconciler_config()))
            .with_tick_interval(config.tick_interval)
    }
}

impl<D: SchedulerDriver, C: Clock> Scheduler<D, C> {
    pub fn with_reconciler(driver: D, reconciler: TaskReconciler<C>) -> Self {
        Self {
            driver,
            framework_id: None,
            reconciler,
            cleanup: ResourceCleanerScheduler::new(
                ResourceCleaner::default(),
                OfferAccepter::default(),
            ),
            cleanup_enabled: false,
            plan: None,
            decline_filters: Filters::default(),
            tick_interval: Duration::from_secs(1),
        }
    }

    /// Replaces the accepter used for cleanup operations.
    #[must_use]
    pub fn with_accepter(mut self, accepter: OfferAccepter) -> Self {
        self.cleanup = ResourceCleanerScheduler::new(self.cleanup.cleaner().clone(), accepter);
        self
    }

    /// Sets the tick period. A zero period is ignored and the current one
    /// kept, since the loop's interval timer cannot tick at zero.
    #[must_use]
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        if tick_interval.is_zero() {
            warn!(
                kept_ms = u64::try_from(self.tick_interval.as_millis()).unwrap_or(u64::MAX),
                "Ignoring zero tick interval"
            );
        } else {
            self.tick_interval = tick_interval;
        }
        self
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    #[must_use]
    pub fn with_decline_filters(mut self, filters: Filters) -> Self {
        self.decline_filters = filters;
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn framework_id(&self) -> Option<&FrameworkId> {
        self.framework_id.as_ref()
    }

    pub fn reconciler(&self) -> &TaskReconciler<C> {
        &self.reconciler
    }

    pub fn plan(&self) -> Option<&PlanManager> {
        self.plan.as_ref()
    }

    /// Replaces the set of requirements whose reservations must be kept.
    ///
    /// Cleanup stays off until this is called at least once; before that
    /// the scheduler cannot tell a claimed reservation from an orphan.
    pub fn set_requirements(&mut self, requirements: &[OfferRequirement]) {
        self.cleanup
            .set_cleaner(ResourceCleaner::from_requirements(requirements));
        self.cleanup_enabled = true;
        info!(requirements = requirements.len(), "Updated expected resources");
    }

    pub fn load_plan(&mut self, plan: PlanManager) {
        info!(
            plan_id = %plan.plan().id(),
            plan = plan.plan().name(),
            phases = plan.plan().phases().len(),
            "Loaded plan"
        );
        self.plan = Some(plan);
    }

    /// Handles one event.
    #[instrument(skip_all, fields(event = event.kind()))]
    pub fn handle(&mut self, event: ClusterEvent) -> SchedulerResult<()> {
        match event {
            ClusterEvent::Registered {
                framework_id,
                known_tasks,
            } => {
                info!(%framework_id, tasks = known_tasks.len(), "Registered");
                self.framework_id = Some(framework_id);
                self.start_reconciliation(known_tasks)
            }
            ClusterEvent::Reregistered { known_tasks } => {
                info!(tasks = known_tasks.len(), "Reregistered");
                self.start_reconciliation(known_tasks)
            }
            ClusterEvent::Offers { offers } => self.resource_offers(&offers),
            ClusterEvent::StatusUpdate { status } => {
                self.status_update(&status);
                Ok(())
            }
            ClusterEvent::Operator { command } => self.operator(command),
        }
    }

    /// Periodic work between events.
    pub fn tick(&mut self) -> ReconcileResult<()> {
        self.reconciler.reconcile(&mut self.driver)
    }

    fn start_reconciliation(&mut self, known_tasks: Vec<TaskStatus>) -> SchedulerResult<()> {
        self.reconciler.start(known_tasks);
        self.reconciler.reconcile(&mut self.driver)?;
        Ok(())
    }

    fn resource_offers(&mut self, offers: &[Offer]) -> SchedulerResult<()> {
        if let Err(e) = self.reconciler.reconcile(&mut self.driver) {
            warn!(error = %e, "Reconciliation request failed");
        }

        if !self.reconciler.is_reconciled() {
            info!(
                offers = offers.len(),
                remaining = self.reconciler.remaining().len(),
                "Declining offers until reconciliation completes"
            );
            self.decline(offers.iter());
            return Ok(());
        }

        let report = if self.cleanup_enabled {
            self.cleanup.resource_offers(&mut self.driver, offers)
        } else {
            debug!("Skipping cleanup, expected resources not loaded");
            CleanupReport::default()
        };

        // Offers behind a failed accept were not consumed either.
        self.decline(offers.iter().filter(|o| !report.accepted.contains(&o.id)));
        report.into_result()?;
        Ok(())
    }

    fn decline<'a>(&mut self, offers: impl Iterator<Item = &'a Offer>) {
        for offer in offers {
            if let Err(e) = self.driver.decline_offer(&offer.id, &self.decline_filters) {
                warn!(offer_id = %offer.id, error = %e, "Failed to decline offer");
            }
        }
    }

    fn status_update(&mut self, status: &TaskStatus) {
        debug!(
            task_id = %status.task_id,
            state = status.state.as_str(),
            "Task status"
        );
        self.reconciler.update(status);
        if status.state.is_terminal() {
            info!(
                task_id = %status.task_id,
                state = status.state.as_str(),
                message = status.message.as_deref().unwrap_or(""),
                "Task reached a terminal state"
            );
        }
    }

    fn operator(&mut self, command: OperatorCommand) -> SchedulerResult<()> {
        let plan = self.plan.as_mut().ok_or(SchedulerError::NoPlan)?;
        match command {
            OperatorCommand::Proceed => plan.proceed(),
            OperatorCommand::Interrupt => plan.interrupt(),
            OperatorCommand::Restart { phase_id, block_id } => {
                plan.restart(phase_id, block_id)?;
            }
            OperatorCommand::ForceComplete { phase_id, block_id } => {
                if !plan.force_complete(phase_id, block_id)? {
                    warn!(%phase_id, %block_id, "Block is not selected, not forcing complete");
                }
            }
        }
        info!(status = %plan.status(), "Plan updated");
        Ok(())
    }

    /// Handles events and ticks until shutdown or until the event channel
    /// closes. Returns the scheduler so its state can be inspected.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<ClusterEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Self {
        info!(
            tick_interval_ms = u64::try_from(self.tick_interval.as_millis()).unwrap_or(u64::MAX),
            "Starting scheduler loop"
        );

        let mut tick = tokio::time::interval(self.tick_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    if let Err(e) = self.tick() {
                        warn!(error = %e, "Reconciliation request failed");
                    }
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        info!("Event channel closed");
                        break;
                    };
                    if let Err(e) = self.handle(event) {
                        error!(error = %e, "Failed to handle event");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Scheduler shutting down");
                        break;
                    }
                }
            }
        }

        self
    }
}
