//! Ordered groups of blocks.

use std::fmt;

use serde::{Deserialize, Serialize};
use stagehand_id::{BlockId, PhaseId};

use crate::block::Block;

/// An ordered sequence of blocks. Its status is derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    id: PhaseId,
    name: String,
    blocks: Vec<Block>,
}

impl Phase {
    pub fn new(name: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self::with_id(PhaseId::new(), name, blocks)
    }

    pub fn with_id(id: PhaseId, name: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            id,
            name: name.into(),
            blocks,
        }
    }

    pub fn id(&self) -> PhaseId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    pub fn index_of(&self, block_id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == block_id)
    }

    pub fn block_by_id(&self, block_id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == block_id)
    }

    pub fn block_by_id_mut(&mut self, block_id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id() == block_id)
    }

    /// Index of the first block that is not Complete.
    pub fn first_incomplete(&self) -> Option<usize> {
        self.blocks.iter().position(|b| !b.is_complete())
    }

    pub fn is_complete(&self) -> bool {
        self.blocks.iter().all(Block::is_complete)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] ({} blocks)",
            self.name,
            self.id,
            self.blocks.len()
        )
    }
}
