//! Error types for plan operations.

use stagehand_id::{BlockId, PhaseId};
use thiserror::Error;

/// Result type for plan operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors for commands that name plan elements.
///
/// Transitions that do not apply (forcing a block that is not current,
/// completing a block that never started) are no-ops, not errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("phase not found: {0}")]
    PhaseNotFound(PhaseId),

    #[error("block {block_id} not found in phase {phase_id}")]
    BlockNotFound { phase_id: PhaseId, block_id: BlockId },
}
