//! Operations the scheduler asks the cluster to perform against an offer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resource::Resource;
use crate::task::TaskInfo;

/// The kind of an [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Reserve,
    Unreserve,
    Create,
    Destroy,
    Launch,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reserve => "reserve",
            Self::Unreserve => "unreserve",
            Self::Create => "create",
            Self::Destroy => "destroy",
            Self::Launch => "launch",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cluster operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    Reserve { resources: Vec<Resource> },
    Unreserve { resources: Vec<Resource> },
    Create { volumes: Vec<Resource> },
    Destroy { volumes: Vec<Resource> },
    Launch { task_infos: Vec<TaskInfo> },
}

impl Operation {
    pub fn operation_type(&self) -> OperationType {
        match self {
            Self::Reserve { .. } => OperationType::Reserve,
            Self::Unreserve { .. } => OperationType::Unreserve,
            Self::Create { .. } => OperationType::Create,
            Self::Destroy { .. } => OperationType::Destroy,
            Self::Launch { .. } => OperationType::Launch,
        }
    }

    /// Returns true for a launch whose every task is transient.
    pub fn is_transient_launch(&self) -> bool {
        match self {
            Self::Launch { task_infos } => {
                !task_infos.is_empty() && task_infos.iter().all(TaskInfo::is_transient)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.operation_type())?;
        match self {
            Self::Reserve { resources }
            | Self::Unreserve { resources }
            | Self::Create { volumes: resources }
            | Self::Destroy { volumes: resources } => {
                for (i, resource) in resources.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{resource}")?;
                }
            }
            Self::Launch { task_infos } => {
                for (i, task) in task_infos.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", task.task_id)?;
                }
            }
        }
        f.write_str("]")
    }
}
