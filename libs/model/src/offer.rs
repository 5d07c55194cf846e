//! Offers of free capacity on one agent.

use std::fmt;

use serde::{Deserialize, Serialize};
use stagehand_id::{AgentId, FrameworkId, OfferId};

use crate::resource::Resource;

/// A time-limited grant of resources on one agent.
///
/// The offer id is valid for a single accept or decline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub framework_id: FrameworkId,
    pub agent_id: AgentId,
    pub hostname: String,
    pub resources: Vec<Resource>,
}

impl Offer {
    /// Returns the resources that are reserved.
    pub fn reserved_resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(|r| r.is_reserved())
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "offer {} on agent {} ({}) with {} resources",
            self.id,
            self.agent_id,
            self.hostname,
            self.resources.len()
        )
    }
}

/// Filters passed along with an accept or decline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    /// How long the cluster should hold back the declined resources.
    pub refuse_seconds: f64,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            refuse_seconds: 1.0,
        }
    }
}
