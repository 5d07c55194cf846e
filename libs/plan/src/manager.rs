//! Driving a plan phase by phase.

use stagehand_id::{BlockId, PhaseId};
use tracing::info;

use crate::block::Block;
use crate::error::{PlanError, PlanResult};
use crate::phase::Phase;
use crate::plan::Plan;
use crate::status::Status;
use crate::strategy::{InstallStrategy, PhaseStrategy, StageStrategy};

/// Owns a plan and one strategy per phase.
///
/// Phases run in order: the current phase is the first whose strategy does
/// not report Complete. Operator commands (`proceed`, `interrupt`) go to the
/// current phase only.
#[derive(Debug)]
pub struct PlanManager {
    plan: Plan,
    strategies: Vec<Box<dyn PhaseStrategy>>,
}

impl PlanManager {
    /// Pairs each phase with a strategy built by `strategy`.
    pub fn new<F>(plan: Plan, mut strategy: F) -> Self
    where
        F: FnMut(&Phase) -> Box<dyn PhaseStrategy>,
    {
        let strategies = plan.phases().iter().map(&mut strategy).collect();
        Self { plan, strategies }
    }

    /// Every phase waits for an operator before each block.
    pub fn staged(plan: Plan) -> Self {
        Self::new(plan, |_| Box::new(StageStrategy::new()))
    }

    /// Every phase runs its blocks back to back.
    pub fn install(plan: Plan) -> Self {
        Self::new(plan, |_| Box::new(InstallStrategy::new()))
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    fn current_index(&self) -> Option<usize> {
        self.plan
            .phases()
            .iter()
            .zip(&self.strategies)
            .position(|(phase, strategy)| strategy.status(phase) != Status::Complete)
    }

    fn locate(&self, phase_id: PhaseId) -> PlanResult<usize> {
        self.plan
            .index_of(phase_id)
            .ok_or(PlanError::PhaseNotFound(phase_id))
    }

    /// The first phase that is not yet Complete.
    pub fn current_phase(&self) -> Option<&Phase> {
        self.plan.phase(self.current_index()?)
    }

    /// The block selected by the current phase's strategy.
    pub fn current_block(&self) -> Option<&Block> {
        let index = self.current_index()?;
        let phase = self.plan.phase(index)?;
        self.strategies.get(index)?.current_block(phase)
    }

    /// Mutable access to a block, for whatever executes it.
    pub fn block_mut(&mut self, phase_id: PhaseId, block_id: BlockId) -> PlanResult<&mut Block> {
        let index = self.locate(phase_id)?;
        self.plan
            .phase_mut(index)
            .and_then(|phase| phase.block_by_id_mut(block_id))
            .ok_or(PlanError::BlockNotFound { phase_id, block_id })
    }

    pub fn proceed(&mut self) {
        let Some(index) = self.current_index() else {
            return;
        };
        if let (Some(phase), Some(strategy)) =
            (self.plan.phase(index), self.strategies.get_mut(index))
        {
            info!(phase_id = %phase.id(), "Proceeding");
            strategy.proceed(phase);
        }
    }

    pub fn interrupt(&mut self) {
        let Some(index) = self.current_index() else {
            return;
        };
        if let Some(strategy) = self.strategies.get_mut(index) {
            info!(phase = index, "Interrupting");
            strategy.interrupt();
        }
    }

    pub fn is_interrupted(&self) -> bool {
        self.current_index()
            .and_then(|i| self.strategies.get(i))
            .is_some_and(|s| s.is_interrupted())
    }

    pub fn restart(&mut self, phase_id: PhaseId, block_id: BlockId) -> PlanResult<()> {
        let index = self.locate(phase_id)?;
        let (Some(phase), Some(strategy)) =
            (self.plan.phase_mut(index), self.strategies.get_mut(index))
        else {
            return Err(PlanError::PhaseNotFound(phase_id));
        };
        strategy.restart(phase, block_id)?;
        info!(%phase_id, %block_id, "Restarted block");
        Ok(())
    }

    pub fn force_complete(&mut self, phase_id: PhaseId, block_id: BlockId) -> PlanResult<bool> {
        let index = self.locate(phase_id)?;
        let (Some(phase), Some(strategy)) =
            (self.plan.phase_mut(index), self.strategies.get_mut(index))
        else {
            return Err(PlanError::PhaseNotFound(phase_id));
        };
        strategy.force_complete(phase, block_id)
    }

    /// Status of one phase through its strategy.
    pub fn phase_status(&self, phase_id: PhaseId) -> PlanResult<Status> {
        let index = self.locate(phase_id)?;
        match (self.plan.phase(index), self.strategies.get(index)) {
            (Some(phase), Some(strategy)) => Ok(strategy.status(phase)),
            _ => Err(PlanError::PhaseNotFound(phase_id)),
        }
    }

    /// Status of the whole plan over its phase statuses, by the same rule a
    /// phase applies to its blocks.
    pub fn status(&self) -> Status {
        Status::progress(
            self.plan
                .phases()
                .iter()
                .zip(&self.strategies)
                .map(|(phase, strategy)| strategy.status(phase)),
            self.current_block().is_some(),
        )
    }

    pub fn is_complete(&self) -> bool {
        self.status().is_complete()
    }
}
