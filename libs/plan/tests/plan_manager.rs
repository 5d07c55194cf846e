//! Driving multi-phase plans.

use stagehand_id::{BlockId, PhaseId};
use stagehand_plan::{Block, Phase, Plan, PlanError, PlanManager, Status};

fn plan() -> Plan {
    Plan::new(
        "deploy",
        vec![
            Phase::new("reserve", vec![Block::new("node-0"), Block::new("node-1")]),
            Phase::new("launch", vec![Block::new("node-0")]),
        ],
    )
}

fn ids(manager: &PlanManager, phase: usize, block: usize) -> (PhaseId, BlockId) {
    let phase = manager.plan().phase(phase).unwrap();
    (phase.id(), phase.block(block).unwrap().id())
}

/// Runs the current block to completion.
fn run_current(manager: &mut PlanManager) {
    let phase_id = manager.current_phase().unwrap().id();
    let block_id = manager.current_block().unwrap().id();
    let block = manager.block_mut(phase_id, block_id).unwrap();
    assert!(block.start());
    assert!(block.complete());
}

#[test]
fn test_staged_plan_runs_in_order() {
    let mut manager = PlanManager::staged(plan());
    assert_eq!(manager.status(), Status::Waiting);
    assert!(manager.current_block().is_none());

    let first_phase = manager.current_phase().unwrap().id();
    let (_, reserve0) = ids(&manager, 0, 0);

    manager.proceed();
    assert_eq!(manager.current_block().map(Block::id), Some(reserve0));
    assert_eq!(manager.status(), Status::Pending);

    run_current(&mut manager);
    assert!(manager.current_block().is_none());
    assert_eq!(manager.phase_status(first_phase).unwrap(), Status::Waiting);

    manager.proceed();
    run_current(&mut manager);
    assert_eq!(manager.phase_status(first_phase).unwrap(), Status::Complete);

    let (launch_phase, launch0) = ids(&manager, 1, 0);
    assert_eq!(manager.current_phase().map(Phase::id), Some(launch_phase));
    assert!(manager.current_block().is_none());

    manager.proceed();
    assert_eq!(manager.current_block().map(Block::id), Some(launch0));
    run_current(&mut manager);

    assert!(manager.is_complete());
    assert!(manager.current_phase().is_none());
    assert!(manager.current_block().is_none());
}

#[test]
fn test_staged_plan_status_across_phases() {
    let mut manager = PlanManager::staged(plan());
    let mut seen = vec![manager.status()];

    // reserve: node-0, then node-1; launch: node-0
    for _ in 0..3 {
        manager.proceed();
        seen.push(manager.status());

        let phase_id = manager.current_phase().unwrap().id();
        let block_id = manager.current_block().unwrap().id();
        assert!(manager.block_mut(phase_id, block_id).unwrap().start());
        seen.push(manager.status());
        assert!(manager.block_mut(phase_id, block_id).unwrap().complete());
        seen.push(manager.status());
    }

    use Status::*;
    assert_eq!(
        seen,
        vec![
            Waiting,
            // reserve/node-0
            Pending,
            InProgress,
            Waiting,
            // reserve/node-1, with node-0 already done
            InProgress,
            InProgress,
            Waiting,
            // launch/node-0, with the reserve phase done
            InProgress,
            InProgress,
            Complete,
        ]
    );
}

#[test]
fn test_install_plan_runs_without_proceed() {
    let mut manager = PlanManager::install(plan());
    assert_eq!(manager.status(), Status::Pending);

    for _ in 0..3 {
        run_current(&mut manager);
    }
    assert_eq!(manager.status(), Status::Complete);
}

#[test]
fn test_interrupt_targets_current_phase() {
    let mut manager = PlanManager::install(plan());
    manager.interrupt();
    assert!(manager.is_interrupted());
    assert!(manager.current_block().is_none());

    manager.proceed();
    assert!(!manager.is_interrupted());
    assert!(manager.current_block().is_some());
}

#[test]
fn test_restart_reopens_completed_phase() {
    let mut manager = PlanManager::install(plan());
    run_current(&mut manager);
    run_current(&mut manager);
    let (reserve, reserve1) = ids(&manager, 0, 1);
    assert_eq!(manager.phase_status(reserve).unwrap(), Status::Complete);

    manager.restart(reserve, reserve1).unwrap();
    assert_eq!(manager.current_phase().map(Phase::id), Some(reserve));
    assert_eq!(manager.current_block().map(Block::id), Some(reserve1));
}

#[test]
fn test_force_complete_current_block() {
    let mut manager = PlanManager::staged(plan());
    let (reserve, reserve0) = ids(&manager, 0, 0);
    let (_, reserve1) = ids(&manager, 0, 1);

    assert!(!manager.force_complete(reserve, reserve0).unwrap());

    manager.proceed();
    assert!(manager.force_complete(reserve, reserve0).unwrap());
    assert!(!manager.force_complete(reserve, reserve1).unwrap());
}

#[test]
fn test_unknown_ids() {
    let mut manager = PlanManager::staged(plan());
    let (reserve, _) = ids(&manager, 0, 0);

    let err = manager.restart(PhaseId::new(), BlockId::new()).unwrap_err();
    assert!(matches!(err, PlanError::PhaseNotFound(_)));

    let err = manager.force_complete(reserve, BlockId::new()).unwrap_err();
    assert!(matches!(err, PlanError::BlockNotFound { .. }));

    assert!(manager.block_mut(reserve, BlockId::new()).is_err());
}

#[test]
fn test_plan_json() {
    let plan = plan();
    let json = serde_json::to_string(&plan).unwrap();
    let parsed: Plan = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, plan);
}
