//! Inputs to the scheduler control loop.

use serde::{Deserialize, Serialize};
use stagehand_id::{BlockId, FrameworkId, PhaseId};
use stagehand_model::{Offer, TaskStatus};

/// A callback from the cluster or a command from an operator.
///
/// Events are handled one at a time, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClusterEvent {
    /// The framework registered for the first time.
    Registered {
        framework_id: FrameworkId,
        #[serde(default)]
        known_tasks: Vec<TaskStatus>,
    },
    /// The framework re-registered after a failover.
    Reregistered {
        #[serde(default)]
        known_tasks: Vec<TaskStatus>,
    },
    Offers { offers: Vec<Offer> },
    StatusUpdate { status: TaskStatus },
    Operator { command: OperatorCommand },
}

impl ClusterEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ClusterEvent::Registered { .. } => "registered",
            ClusterEvent::Reregistered { .. } => "reregistered",
            ClusterEvent::Offers { .. } => "offers",
            ClusterEvent::StatusUpdate { .. } => "status_update",
            ClusterEvent::Operator { .. } => "operator",
        }
    }
}

/// Operator control over the loaded plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum OperatorCommand {
    Proceed,
    Interrupt,
    Restart { phase_id: PhaseId, block_id: BlockId },
    ForceComplete { phase_id: PhaseId, block_id: BlockId },
}
