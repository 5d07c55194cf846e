//! The smallest unit of rollout work.

use std::fmt;

use serde::{Deserialize, Serialize};
use stagehand_id::BlockId;
use tracing::debug;

use crate::status::Status;

/// One step of a phase.
///
/// The lifecycle methods return whether the transition applied; a
/// transition that does not fit the lattice leaves the block untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    id: BlockId,
    name: String,
    status: Status,
}

impl Block {
    /// Creates a pending block with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(BlockId::new(), name)
    }

    pub fn with_id(id: BlockId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: Status::Pending,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == Status::InProgress
    }

    pub fn is_complete(&self) -> bool {
        self.status == Status::Complete
    }

    pub fn has_error(&self) -> bool {
        self.status == Status::Error
    }

    /// Pending → InProgress.
    pub fn start(&mut self) -> bool {
        self.transition(Status::Pending, Status::InProgress)
    }

    /// InProgress → Complete.
    pub fn complete(&mut self) -> bool {
        self.transition(Status::InProgress, Status::Complete)
    }

    /// InProgress → Error.
    pub fn fail(&mut self) -> bool {
        self.transition(Status::InProgress, Status::Error)
    }

    /// Any → Pending.
    pub fn restart(&mut self) {
        debug!(block_id = %self.id, from = %self.status, "Restarting block");
        self.status = Status::Pending;
    }

    /// Any non-Complete → Complete, without running the block.
    pub fn force_complete(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        debug!(block_id = %self.id, from = %self.status, "Forcing block complete");
        self.status = Status::Complete;
        true
    }

    fn transition(&mut self, from: Status, to: Status) -> bool {
        if self.status != from {
            debug!(
                block_id = %self.id,
                status = %self.status,
                requested = %to,
                "Ignoring block transition"
            );
            return false;
        }
        self.status = to;
        true
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.name, self.id, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut block = Block::new("block-0");
        assert!(block.is_pending());

        assert!(!block.complete());
        assert!(block.is_pending());

        assert!(block.start());
        assert!(block.is_in_progress());
        assert!(!block.start());

        assert!(block.complete());
        assert!(block.is_complete());
        assert!(!block.fail());
    }

    #[test]
    fn test_error_only_recovers_through_restart() {
        let mut block = Block::new("block-0");
        block.start();
        assert!(block.fail());
        assert!(block.has_error());

        assert!(!block.start());
        assert!(!block.complete());

        block.restart();
        assert!(block.is_pending());
    }

    #[test]
    fn test_force_complete() {
        let mut block = Block::new("block-0");
        assert!(block.force_complete());
        assert!(block.is_complete());
        assert!(!block.force_complete());
    }
}
