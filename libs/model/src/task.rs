//! Task and executor descriptors, and task status reports.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use stagehand_id::{AgentId, ExecutorId, TaskId};

use crate::resource::Resource;

/// Label marking a task as transient: already placed, recorded but never
/// resubmitted to the cluster.
pub const TRANSIENT_LABEL: &str = "transient";

/// An executor that hosts one or more tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorInfo {
    pub executor_id: ExecutorId,
    pub name: String,
    pub resources: Vec<Resource>,
}

/// A task to launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub task_id: TaskId,
    pub name: String,
    pub agent_id: AgentId,
    pub resources: Vec<Resource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor: Option<ExecutorInfo>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl TaskInfo {
    pub fn new(task_id: TaskId, name: impl Into<String>, agent_id: AgentId) -> Self {
        Self {
            task_id,
            name: name.into(),
            agent_id,
            resources: Vec::new(),
            executor: None,
            labels: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_resources(mut self, resources: impl IntoIterator<Item = Resource>) -> Self {
        self.resources.extend(resources);
        self
    }

    #[must_use]
    pub fn with_executor(mut self, executor: ExecutorInfo) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Returns a copy carrying the transient marker.
    #[must_use]
    pub fn set_transient(mut self) -> Self {
        self.labels
            .insert(TRANSIENT_LABEL.to_string(), "true".to_string());
        self
    }

    /// Returns a copy without the transient marker.
    #[must_use]
    pub fn clear_transient(mut self) -> Self {
        self.labels.remove(TRANSIENT_LABEL);
        self
    }

    pub fn is_transient(&self) -> bool {
        self.labels
            .get(TRANSIENT_LABEL)
            .is_some_and(|v| v == "true")
    }
}

/// Task lifecycle state as reported by the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Staging,
    Starting,
    Running,
    Finished,
    Failed,
    Killed,
    Lost,
    Error,
}

impl TaskState {
    /// Returns true if the task will never run again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Finished | Self::Failed | Self::Killed | Self::Lost | Self::Error
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staging => "staging",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Failed => "failed",
            Self::Killed => "killed",
            Self::Lost => "lost",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status report for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub task_id: TaskId,
    pub state: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<AgentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TaskStatus {
    pub fn new(task_id: TaskId, state: TaskState) -> Self {
        Self {
            task_id,
            state,
            agent_id: None,
            message: None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.task_id, self.state)?;
        if let Some(message) = &self.message {
            write!(f, " ({message})")?;
        }
        Ok(())
    }
}
