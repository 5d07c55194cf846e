//! Whole rollout plans.

use std::fmt;

use serde::{Deserialize, Serialize};
use stagehand_id::{PhaseId, PlanId};

use crate::phase::Phase;

/// An ordered sequence of phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    id: PlanId,
    name: String,
    phases: Vec<Phase>,
}

impl Plan {
    pub fn new(name: impl Into<String>, phases: Vec<Phase>) -> Self {
        Self {
            id: PlanId::new(),
            name: name.into(),
            phases,
        }
    }

    pub fn id(&self) -> PlanId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn phase(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index)
    }

    pub fn phase_mut(&mut self, index: usize) -> Option<&mut Phase> {
        self.phases.get_mut(index)
    }

    pub fn index_of(&self, phase_id: PhaseId) -> Option<usize> {
        self.phases.iter().position(|p| p.id() == phase_id)
    }

    pub fn is_complete(&self) -> bool {
        self.phases.iter().all(Phase::is_complete)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] ({} phases)", self.name, self.id, self.phases.len())
    }
}
