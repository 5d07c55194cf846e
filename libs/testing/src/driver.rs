use stagehand_id::OfferId;
use stagehand_model::{DriverError, Filters, Operation, SchedulerDriver, TaskStatus};

/// One call made against a [`RecordingDriver`].
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    Accept {
        offer_ids: Vec<OfferId>,
        operations: Vec<Operation>,
    },
    Decline {
        offer_id: OfferId,
    },
    Reconcile {
        statuses: Vec<TaskStatus>,
    },
}

/// A driver that records calls instead of talking to a cluster.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    calls: Vec<DriverCall>,
    fail_with: Option<DriverError>,
    rejected_offers: Vec<OfferId>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver that rejects every call with `error` (the call is still
    /// recorded).
    pub fn failing(error: DriverError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    /// Rejects any accept naming `offer_id`; every other call succeeds.
    #[must_use]
    pub fn rejecting_offer(mut self, offer_id: OfferId) -> Self {
        self.rejected_offers.push(offer_id);
        self
    }

    pub fn calls(&self) -> &[DriverCall] {
        &self.calls
    }

    pub fn accepts(&self) -> Vec<(&[OfferId], &[Operation])> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DriverCall::Accept {
                    offer_ids,
                    operations,
                } => Some((offer_ids.as_slice(), operations.as_slice())),
                _ => None,
            })
            .collect()
    }

    pub fn declines(&self) -> Vec<&OfferId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DriverCall::Decline { offer_id } => Some(offer_id),
                _ => None,
            })
            .collect()
    }

    pub fn reconciles(&self) -> Vec<&[TaskStatus]> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DriverCall::Reconcile { statuses } => Some(statuses.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn outcome(&self) -> Result<(), DriverError> {
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl SchedulerDriver for RecordingDriver {
    fn accept_offers(
        &mut self,
        offer_ids: &[OfferId],
        operations: &[Operation],
        _filters: &Filters,
    ) -> Result<(), DriverError> {
        self.calls.push(DriverCall::Accept {
            offer_ids: offer_ids.to_vec(),
            operations: operations.to_vec(),
        });
        if let Some(rejected) = offer_ids.iter().find(|id| self.rejected_offers.contains(*id)) {
            return Err(DriverError::Rejected(format!("offer {rejected} rejected")));
        }
        self.outcome()
    }

    fn decline_offer(&mut self, offer_id: &OfferId, _filters: &Filters) -> Result<(), DriverError> {
        self.calls.push(DriverCall::Decline {
            offer_id: offer_id.clone(),
        });
        self.outcome()
    }

    fn reconcile_tasks(&mut self, statuses: &[TaskStatus]) -> Result<(), DriverError> {
        self.calls.push(DriverCall::Reconcile {
            statuses: statuses.to_vec(),
        });
        self.outcome()
    }
}
