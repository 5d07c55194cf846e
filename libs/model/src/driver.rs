//! Interfaces of the collaborators the core is handed.
//!
//! - [`SchedulerDriver`]: the transport to the cluster
//! - [`OperationRecorder`]: observer notified of every operation
//! - [`Clock`]: time source, swapped for a manual clock in tests

use std::sync::Arc;

use stagehand_id::OfferId;

use crate::error::{DriverError, RecordError};
use crate::offer::{Filters, Offer};
use crate::operation::Operation;
use crate::task::TaskStatus;

/// Transport to the cluster resource manager.
///
/// Calls are treated as black boxes that may fail; the core never retries
/// them itself.
pub trait SchedulerDriver {
    /// Accepts `offer_ids` (all on the same agent), applying `operations`.
    fn accept_offers(
        &mut self,
        offer_ids: &[OfferId],
        operations: &[Operation],
        filters: &Filters,
    ) -> Result<(), DriverError>;

    /// Returns an offer unused.
    fn decline_offer(&mut self, offer_id: &OfferId, filters: &Filters) -> Result<(), DriverError>;

    /// Asks the cluster to resend the status of the given tasks. An empty
    /// slice requests implicit reconciliation of every task the framework
    /// owns.
    fn reconcile_tasks(&mut self, statuses: &[TaskStatus]) -> Result<(), DriverError>;
}

impl<D: SchedulerDriver + ?Sized> SchedulerDriver for &mut D {
    fn accept_offers(
        &mut self,
        offer_ids: &[OfferId],
        operations: &[Operation],
        filters: &Filters,
    ) -> Result<(), DriverError> {
        (**self).accept_offers(offer_ids, operations, filters)
    }

    fn decline_offer(&mut self, offer_id: &OfferId, filters: &Filters) -> Result<(), DriverError> {
        (**self).decline_offer(offer_id, filters)
    }

    fn reconcile_tasks(&mut self, statuses: &[TaskStatus]) -> Result<(), DriverError> {
        (**self).reconcile_tasks(statuses)
    }
}

/// Observer invoked once for every operation the accepter processes.
pub trait OperationRecorder: Send {
    fn record(&mut self, operation: &Operation, offer: &Offer) -> Result<(), RecordError>;
}

/// Source of wall-clock milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }
}
