//! Progression strategies over a phase's blocks.
//!
//! A strategy never owns blocks. It keeps a cursor and is handed the phase
//! on every call, so block status lives in exactly one place.

use std::fmt::Debug;

use stagehand_id::BlockId;
use tracing::{debug, info};

use crate::block::Block;
use crate::error::{PlanError, PlanResult};
use crate::phase::Phase;
use crate::status::Status;

/// Decides which block of a phase may run next.
pub trait PhaseStrategy: Send + Debug {
    /// The block currently selected to run, if any.
    fn current_block<'a>(&self, phase: &'a Phase) -> Option<&'a Block>;

    /// Resumes progression and selects the next eligible block.
    fn proceed(&mut self, phase: &Phase);

    /// Pauses progression.
    fn interrupt(&mut self);

    fn is_interrupted(&self) -> bool;

    /// Resets a block to Pending. Does not move the selection.
    fn restart(&mut self, phase: &mut Phase, block_id: BlockId) -> PlanResult<()>;

    /// Forces a block to Complete. Returns whether the block was changed.
    fn force_complete(&mut self, phase: &mut Phase, block_id: BlockId) -> PlanResult<bool>;

    /// Status of the phase as seen through this strategy.
    fn status(&self, phase: &Phase) -> Status {
        Status::progress(
            phase.blocks().iter().map(Block::status),
            self.current_block(phase).is_some(),
        )
    }
}

fn restart_block(phase: &mut Phase, block_id: BlockId) -> PlanResult<()> {
    let phase_id = phase.id();
    let block = phase
        .block_by_id_mut(block_id)
        .ok_or(PlanError::BlockNotFound { phase_id, block_id })?;
    block.restart();
    Ok(())
}

/// Runs blocks one at a time, and only when told to.
///
/// Each completed block parks the strategy until the next `proceed`. A
/// phase whose blocks are all Complete keeps reporting its last selected
/// block as current.
#[derive(Debug, Default)]
pub struct StageStrategy {
    cursor: Option<usize>,
    interrupted: bool,
}

impl StageStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_eligible(&self, phase: &Phase, index: usize) -> bool {
        phase.block(index).is_some_and(|b| !b.is_complete())
    }
}

impl PhaseStrategy for StageStrategy {
    fn current_block<'a>(&self, phase: &'a Phase) -> Option<&'a Block> {
        let block = phase.block(self.cursor?)?;
        if !block.is_complete() || phase.is_complete() {
            Some(block)
        } else {
            None
        }
    }

    fn proceed(&mut self, phase: &Phase) {
        self.interrupted = false;
        if self.cursor.is_some_and(|i| self.is_eligible(phase, i)) {
            return;
        }
        if let Some(next) = phase.first_incomplete() {
            debug!(phase_id = %phase.id(), block = next, "Selected next block");
            self.cursor = Some(next);
        }
    }

    fn interrupt(&mut self) {
        self.interrupted = true;
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    fn restart(&mut self, phase: &mut Phase, block_id: BlockId) -> PlanResult<()> {
        restart_block(phase, block_id)
    }

    fn force_complete(&mut self, phase: &mut Phase, block_id: BlockId) -> PlanResult<bool> {
        let phase_id = phase.id();
        let index = phase
            .index_of(block_id)
            .ok_or(PlanError::BlockNotFound { phase_id, block_id })?;

        let is_current = self
            .current_block(phase)
            .is_some_and(|b| b.id() == block_id);
        if !is_current {
            debug!(%phase_id, %block_id, "Ignoring force complete of unselected block");
            return Ok(false);
        }

        let forced = phase
            .block_mut(index)
            .is_some_and(Block::force_complete);
        if forced {
            info!(%phase_id, %block_id, "Forced block complete");
        }
        Ok(forced)
    }
}

/// Runs blocks back to back without waiting for an operator.
///
/// While interrupted, a block that has not started yet is withheld; one
/// already running stays current until it finishes.
#[derive(Debug, Default)]
pub struct InstallStrategy {
    interrupted: bool,
}

impl InstallStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PhaseStrategy for InstallStrategy {
    fn current_block<'a>(&self, phase: &'a Phase) -> Option<&'a Block> {
        match phase.first_incomplete() {
            Some(index) => {
                let block = phase.block(index)?;
                if self.interrupted && block.is_pending() {
                    None
                } else {
                    Some(block)
                }
            }
            None => phase.blocks().last(),
        }
    }

    fn proceed(&mut self, _phase: &Phase) {
        self.interrupted = false;
    }

    fn interrupt(&mut self) {
        self.interrupted = true;
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    fn restart(&mut self, phase: &mut Phase, block_id: BlockId) -> PlanResult<()> {
        restart_block(phase, block_id)
    }

    fn force_complete(&mut self, phase: &mut Phase, block_id: BlockId) -> PlanResult<bool> {
        let phase_id = phase.id();
        if phase.index_of(block_id).is_none() {
            return Err(PlanError::BlockNotFound { phase_id, block_id });
        }
        let is_current = self
            .current_block(phase)
            .is_some_and(|b| b.id() == block_id);
        if !is_current {
            return Ok(false);
        }
        Ok(phase
            .block_by_id_mut(block_id)
            .is_some_and(Block::force_complete))
    }
}
