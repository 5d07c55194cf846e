use std::sync::{Arc, Mutex, MutexGuard};

use stagehand_model::{Offer, Operation, OperationRecorder, OperationType, RecordError};

#[derive(Debug, Default)]
struct Recorded {
    reserves: Vec<Operation>,
    unreserves: Vec<Operation>,
    creates: Vec<Operation>,
    destroys: Vec<Operation>,
    launches: Vec<Operation>,
}

/// Sorts recorded operations into per-kind lists.
///
/// Clones share storage, so a test keeps one handle while the accepter owns
/// another. `rejecting` builds a recorder that refuses one operation kind,
/// for exercising the failure path.
#[derive(Debug, Clone, Default)]
pub struct TestOperationRecorder {
    recorded: Arc<Mutex<Recorded>>,
    reject: Option<OperationType>,
}

impl TestOperationRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(kind: OperationType) -> Self {
        Self {
            recorded: Arc::default(),
            reject: Some(kind),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.recorded
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn reserves(&self) -> Vec<Operation> {
        self.lock().reserves.clone()
    }

    pub fn unreserves(&self) -> Vec<Operation> {
        self.lock().unreserves.clone()
    }

    pub fn creates(&self) -> Vec<Operation> {
        self.lock().creates.clone()
    }

    pub fn destroys(&self) -> Vec<Operation> {
        self.lock().destroys.clone()
    }

    pub fn launches(&self) -> Vec<Operation> {
        self.lock().launches.clone()
    }

    pub fn total(&self) -> usize {
        let r = self.lock();
        r.reserves.len() + r.unreserves.len() + r.creates.len() + r.destroys.len() + r.launches.len()
    }
}

impl OperationRecorder for TestOperationRecorder {
    fn record(&mut self, operation: &Operation, _offer: &Offer) -> Result<(), RecordError> {
        let kind = operation.operation_type();
        if self.reject == Some(kind) {
            return Err(RecordError::UnknownOperation(kind.to_string()));
        }

        let mut recorded = self.lock();
        let list = match kind {
            OperationType::Reserve => &mut recorded.reserves,
            OperationType::Unreserve => &mut recorded.unreserves,
            OperationType::Create => &mut recorded.creates,
            OperationType::Destroy => &mut recorded.destroys,
            OperationType::Launch => &mut recorded.launches,
        };
        list.push(operation.clone());
        Ok(())
    }
}
