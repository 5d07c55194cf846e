//! What a set of tasks already owns.
//!
//! An [`OfferRequirement`] wraps the task and executor descriptors for one
//! scheduling decision and records, once, every reservation id and
//! persistence id they reference. Those sets are what lets the cleaner tell
//! a claimed reservation from an orphaned one.

use std::collections::{BTreeSet, HashSet};

use stagehand_id::{PersistenceId, ResourceId};
use stagehand_model::{ExecutorInfo, Resource, TaskInfo};

use crate::error::{OfferError, OfferResult};

fn collect_ids<'a>(
    resources: impl IntoIterator<Item = &'a Resource>,
    resource_ids: &mut BTreeSet<ResourceId>,
    persistence_ids: &mut BTreeSet<PersistenceId>,
) {
    for resource in resources {
        if let Some(id) = resource.resource_id() {
            resource_ids.insert(id.clone());
        }
        if let Some(id) = resource.persistence_id() {
            persistence_ids.insert(id.clone());
        }
    }
}

/// One task descriptor and the ids it references.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRequirement {
    task_info: TaskInfo,
    resource_ids: BTreeSet<ResourceId>,
    persistence_ids: BTreeSet<PersistenceId>,
}

impl TaskRequirement {
    pub fn new(task_info: TaskInfo) -> Self {
        let mut resource_ids = BTreeSet::new();
        let mut persistence_ids = BTreeSet::new();
        collect_ids(&task_info.resources, &mut resource_ids, &mut persistence_ids);
        Self {
            task_info,
            resource_ids,
            persistence_ids,
        }
    }

    pub fn task_info(&self) -> &TaskInfo {
        &self.task_info
    }

    pub fn resource_ids(&self) -> &BTreeSet<ResourceId> {
        &self.resource_ids
    }

    pub fn persistence_ids(&self) -> &BTreeSet<PersistenceId> {
        &self.persistence_ids
    }
}

/// The executor descriptor and the ids it references.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorRequirement {
    executor_info: ExecutorInfo,
    resource_ids: BTreeSet<ResourceId>,
    persistence_ids: BTreeSet<PersistenceId>,
}

impl ExecutorRequirement {
    pub fn new(executor_info: ExecutorInfo) -> Self {
        let mut resource_ids = BTreeSet::new();
        let mut persistence_ids = BTreeSet::new();
        collect_ids(
            &executor_info.resources,
            &mut resource_ids,
            &mut persistence_ids,
        );
        Self {
            executor_info,
            resource_ids,
            persistence_ids,
        }
    }

    pub fn executor_info(&self) -> &ExecutorInfo {
        &self.executor_info
    }

    pub fn resource_ids(&self) -> &BTreeSet<ResourceId> {
        &self.resource_ids
    }

    pub fn persistence_ids(&self) -> &BTreeSet<PersistenceId> {
        &self.persistence_ids
    }
}

/// Immutable requirement for one scheduling decision.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferRequirement {
    task_requirements: Vec<TaskRequirement>,
    executor_requirement: Option<ExecutorRequirement>,
    resource_ids: BTreeSet<ResourceId>,
    persistence_ids: BTreeSet<PersistenceId>,
}

impl OfferRequirement {
    /// Builds a requirement for tasks sharing an optional executor.
    ///
    /// Fails with [`OfferError::InvalidRequirement`] if there are no tasks,
    /// two tasks share an id, or the tasks disagree about their executor.
    pub fn new(tasks: Vec<TaskInfo>, executor: Option<ExecutorInfo>) -> OfferResult<Self> {
        validate(&tasks, executor.as_ref())?;

        let task_requirements: Vec<TaskRequirement> =
            tasks.into_iter().map(TaskRequirement::new).collect();
        let executor_requirement = executor.map(ExecutorRequirement::new);

        let mut resource_ids = BTreeSet::new();
        let mut persistence_ids = BTreeSet::new();
        for task in &task_requirements {
            resource_ids.extend(task.resource_ids.iter().cloned());
            persistence_ids.extend(task.persistence_ids.iter().cloned());
            if let Some(embedded) = &task.task_info.executor {
                collect_ids(&embedded.resources, &mut resource_ids, &mut persistence_ids);
            }
        }
        if let Some(executor) = &executor_requirement {
            resource_ids.extend(executor.resource_ids.iter().cloned());
            persistence_ids.extend(executor.persistence_ids.iter().cloned());
        }

        Ok(Self {
            task_requirements,
            executor_requirement,
            resource_ids,
            persistence_ids,
        })
    }

    /// Builds a requirement for tasks without a separate executor.
    pub fn from_tasks(tasks: Vec<TaskInfo>) -> OfferResult<Self> {
        Self::new(tasks, None)
    }

    pub fn task_requirements(&self) -> &[TaskRequirement] {
        &self.task_requirements
    }

    pub fn executor_requirement(&self) -> Option<&ExecutorRequirement> {
        self.executor_requirement.as_ref()
    }

    /// Every reservation id referenced by the tasks and executor.
    pub fn resource_ids(&self) -> &BTreeSet<ResourceId> {
        &self.resource_ids
    }

    /// Every persistent volume id referenced by the tasks and executor.
    pub fn persistence_ids(&self) -> &BTreeSet<PersistenceId> {
        &self.persistence_ids
    }

    /// Every resource attached to a task, an embedded executor or the
    /// separate executor.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        let task_resources = self.task_requirements.iter().flat_map(|t| {
            let embedded = t
                .task_info
                .executor
                .iter()
                .flat_map(|e| e.resources.iter());
            t.task_info.resources.iter().chain(embedded)
        });
        let executor_resources = self
            .executor_requirement
            .iter()
            .flat_map(|e| e.executor_info.resources.iter());
        task_resources.chain(executor_resources)
    }
}

fn validate(tasks: &[TaskInfo], executor: Option<&ExecutorInfo>) -> OfferResult<()> {
    if tasks.is_empty() {
        return Err(OfferError::InvalidRequirement(
            "at least one task is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for task in tasks {
        if !seen.insert(&task.task_id) {
            return Err(OfferError::InvalidRequirement(format!(
                "duplicate task id {}",
                task.task_id
            )));
        }
    }

    // Every embedded executor must agree with the separate one, or with the
    // first embedded one when none was given.
    let mut expected = executor;
    for task in tasks {
        let Some(embedded) = &task.executor else {
            continue;
        };
        match expected {
            None => expected = Some(embedded),
            Some(existing) if existing == embedded => {}
            Some(existing) => {
                return Err(OfferError::InvalidRequirement(format!(
                    "task {} uses executor {} but the requirement uses executor {}",
                    task.task_id, embedded.executor_id, existing.executor_id
                )));
            }
        }
    }

    Ok(())
}
