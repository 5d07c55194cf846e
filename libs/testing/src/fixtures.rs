//! Canned values shared across tests.

use stagehand_id::{AgentId, ExecutorId, FrameworkId, OfferId, PersistenceId, ResourceId, TaskId};
use stagehand_model::{ExecutorInfo, Offer, Resource, TaskInfo, TaskState, TaskStatus};

pub const TEST_ROLE: &str = "test-role";
pub const TEST_PRINCIPAL: &str = "test-principal";
pub const TEST_CONTAINER_PATH: &str = "test-container-path";
pub const TEST_HOSTNAME: &str = "test-hostname";

pub fn framework_id() -> FrameworkId {
    FrameworkId::new("test-framework-id")
}

pub fn agent_id() -> AgentId {
    AgentId::new("test-agent-id")
}

pub fn persistence_id() -> PersistenceId {
    PersistenceId::new("test-persistence-id")
}

/// An offer on `agent` with the given resources.
pub fn offer_on(offer_id: &str, agent: &str, resources: Vec<Resource>) -> Offer {
    Offer {
        id: OfferId::new(offer_id),
        framework_id: framework_id(),
        agent_id: AgentId::new(agent),
        hostname: agent.to_string(),
        resources,
    }
}

/// An offer on the default test agent.
pub fn offer(resources: Vec<Resource>) -> Offer {
    Offer {
        id: OfferId::new("test-offer-id"),
        framework_id: framework_id(),
        agent_id: agent_id(),
        hostname: TEST_HOSTNAME.to_string(),
        resources,
    }
}

pub fn reserved_cpus(value: f64, resource_id: &str) -> Resource {
    Resource::reserved_cpus(value, TEST_ROLE, TEST_PRINCIPAL, ResourceId::new(resource_id))
}

pub fn volume(megabytes: f64, resource_id: &str, persistence_id: &str) -> Resource {
    Resource::volume(
        megabytes,
        TEST_ROLE,
        TEST_PRINCIPAL,
        ResourceId::new(resource_id),
        PersistenceId::new(persistence_id),
        TEST_CONTAINER_PATH,
    )
}

pub fn task(task_id: &str, resources: Vec<Resource>) -> TaskInfo {
    TaskInfo::new(TaskId::new(task_id), format!("{task_id}-name"), agent_id())
        .with_resources(resources)
}

pub fn executor(executor_id: &str, resources: Vec<Resource>) -> ExecutorInfo {
    ExecutorInfo {
        executor_id: ExecutorId::new(executor_id),
        name: format!("{executor_id}-name"),
        resources,
    }
}

pub fn status(task_id: &str, state: TaskState) -> TaskStatus {
    TaskStatus::new(TaskId::new(task_id), state)
}
