//! Operations paired with the offer they target.

use std::fmt;

use stagehand_id::AgentId;
use stagehand_model::{Offer, Operation, OperationType, Resource, TaskInfo};

/// A proposed operation and the offer it would consume.
///
/// Built without contacting the cluster; immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferRecommendation {
    offer: Offer,
    operation: Operation,
}

impl OfferRecommendation {
    /// Reserve `resource` out of the offer.
    pub fn reserve(offer: &Offer, resource: Resource) -> Self {
        Self::with_operation(
            offer,
            Operation::Reserve {
                resources: vec![resource],
            },
        )
    }

    /// Release the reservation held on `resource`.
    pub fn unreserve(offer: &Offer, resource: Resource) -> Self {
        Self::with_operation(
            offer,
            Operation::Unreserve {
                resources: vec![resource],
            },
        )
    }

    /// Create a persistent volume.
    pub fn create(offer: &Offer, volume: Resource) -> Self {
        Self::with_operation(
            offer,
            Operation::Create {
                volumes: vec![volume],
            },
        )
    }

    /// Destroy a persistent volume.
    ///
    /// The revocable marker is stripped: a destroy addresses the volume's
    /// durable identity only.
    pub fn destroy(offer: &Offer, volume: &Resource) -> Self {
        Self::with_operation(
            offer,
            Operation::Destroy {
                volumes: vec![volume.without_revocable()],
            },
        )
    }

    /// Launch a task.
    pub fn launch(offer: &Offer, task_info: TaskInfo) -> Self {
        Self::with_operation(
            offer,
            Operation::Launch {
                task_infos: vec![task_info],
            },
        )
    }

    fn with_operation(offer: &Offer, operation: Operation) -> Self {
        Self {
            offer: offer.clone(),
            operation,
        }
    }

    pub fn offer(&self) -> &Offer {
        &self.offer
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn operation_type(&self) -> OperationType {
        self.operation.operation_type()
    }

    pub fn agent_id(&self) -> &AgentId {
        &self.offer.agent_id
    }
}

impl fmt::Display for OfferRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} via offer {} on agent {}",
            self.operation, self.offer.id, self.offer.agent_id
        )
    }
}
