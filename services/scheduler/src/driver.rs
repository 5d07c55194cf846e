//! Driver used when no cluster transport is attached.

use stagehand_id::OfferId;
use stagehand_model::{DriverError, Filters, Operation, SchedulerDriver, TaskStatus};
use tracing::info;

/// Logs every driver call and reports success.
#[derive(Debug, Default)]
pub struct DryRunDriver {
    calls: u64,
}

impl DryRunDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl SchedulerDriver for DryRunDriver {
    fn accept_offers(
        &mut self,
        offer_ids: &[OfferId],
        operations: &[Operation],
        filters: &Filters,
    ) -> Result<(), DriverError> {
        self.calls += 1;
        for operation in operations {
            info!(
                offers = ?offer_ids,
                operation = %operation,
                refuse_seconds = filters.refuse_seconds,
                "[DRY RUN] Accepting offers"
            );
        }
        Ok(())
    }

    fn decline_offer(&mut self, offer_id: &OfferId, filters: &Filters) -> Result<(), DriverError> {
        self.calls += 1;
        info!(
            offer_id = %offer_id,
            refuse_seconds = filters.refuse_seconds,
            "[DRY RUN] Declining offer"
        );
        Ok(())
    }

    fn reconcile_tasks(&mut self, statuses: &[TaskStatus]) -> Result<(), DriverError> {
        self.calls += 1;
        if statuses.is_empty() {
            info!("[DRY RUN] Requesting implicit reconciliation");
        } else {
            info!(tasks = statuses.len(), "[DRY RUN] Requesting task status");
        }
        Ok(())
    }
}
