//! Error types for offer evaluation and acceptance.

use stagehand_id::AgentId;
use stagehand_model::{DriverError, RecordError};
use thiserror::Error;

/// Result type for offer operations.
pub type OfferResult<T> = Result<T, OfferError>;

/// Errors that can occur while building requirements or accepting offers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OfferError {
    /// The task/executor descriptors do not form a consistent requirement.
    #[error("invalid requirement: {0}")]
    InvalidRequirement(String),

    /// A recorder refused an operation; nothing in the batch was submitted.
    #[error("failed to record operation: {0}")]
    Record(#[from] RecordError),

    /// A batch targeted offers on more than one agent.
    #[error("recommendations span agents {first} and {second}")]
    MixedAgents { first: AgentId, second: AgentId },

    /// The cluster transport failed.
    #[error("transport failure: {0}")]
    Transport(#[from] DriverError),
}

impl OfferError {
    /// Returns true if the failure came from the transport and the next offer
    /// cycle may succeed.
    pub fn is_transport(&self) -> bool {
        matches!(self, OfferError::Transport(_))
    }
}
