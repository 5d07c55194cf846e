//! End-to-end behaviour of the scheduler control loop.

use std::time::Duration;

use stagehand_id::OfferId;
use stagehand_model::{Operation, OperationType, Resource, TaskState};
use stagehand_offer::{OfferAccepter, OfferRequirement};
use stagehand_plan::{Block, Phase, Plan, PlanManager, Status};
use stagehand_reconcile::{ReconcilerConfig, TaskReconciler};
use stagehand_scheduler::{ClusterEvent, OperatorCommand, Scheduler, SchedulerError};
use stagehand_testing::{fixtures, ManualClock, RecordingDriver, TestOperationRecorder};
use tokio::sync::{mpsc, watch};

fn scheduler(clock: &ManualClock) -> Scheduler<RecordingDriver, ManualClock> {
    scheduler_with(clock, RecordingDriver::new())
}

fn scheduler_with(
    clock: &ManualClock,
    driver: RecordingDriver,
) -> Scheduler<RecordingDriver, ManualClock> {
    let reconciler = TaskReconciler::with_clock(ReconcilerConfig::default(), clock.clone());
    Scheduler::with_reconciler(driver, reconciler)
}

fn registered(tasks: &[&str]) -> ClusterEvent {
    ClusterEvent::Registered {
        framework_id: fixtures::framework_id(),
        known_tasks: tasks
            .iter()
            .map(|t| fixtures::status(t, TaskState::Running))
            .collect(),
    }
}

fn offers() -> Vec<stagehand_model::Offer> {
    vec![
        fixtures::offer_on(
            "offer-1",
            "agent-1",
            vec![
                fixtures::reserved_cpus(1.0, "kept"),
                fixtures::reserved_cpus(2.0, "orphan"),
            ],
        ),
        fixtures::offer_on("offer-2", "agent-2", vec![Resource::cpus(4.0)]),
    ]
}

fn requirements() -> Vec<OfferRequirement> {
    vec![OfferRequirement::from_tasks(vec![fixtures::task(
        "t-1",
        vec![fixtures::reserved_cpus(1.0, "kept")],
    )])
    .unwrap()]
}

#[test]
fn test_offers_declined_until_reconciled() {
    let clock = ManualClock::new(1_000);
    let mut scheduler = scheduler(&clock);
    scheduler.set_requirements(&requirements());

    scheduler.handle(registered(&["t-1"])).unwrap();
    scheduler
        .handle(ClusterEvent::Offers { offers: offers() })
        .unwrap();

    assert!(scheduler.driver().accepts().is_empty());
    assert_eq!(scheduler.driver().declines().len(), 2);
    // The explicit request from registration throttles the one on offers.
    assert_eq!(scheduler.driver().reconciles().len(), 1);

    scheduler
        .handle(ClusterEvent::StatusUpdate {
            status: fixtures::status("t-1", TaskState::Running),
        })
        .unwrap();
    scheduler.tick().unwrap();
    assert!(scheduler.reconciler().is_reconciled());
    assert_eq!(scheduler.driver().reconciles().len(), 2);
    assert!(scheduler.driver().reconciles()[1].is_empty());
}

#[test]
fn test_orphans_cleaned_and_rest_declined() {
    let clock = ManualClock::new(1_000);
    let recorder = TestOperationRecorder::new();
    let mut scheduler = scheduler(&clock).with_accepter(OfferAccepter::new(recorder.clone()));
    scheduler.set_requirements(&requirements());

    scheduler.handle(registered(&[])).unwrap();
    assert!(scheduler.reconciler().is_reconciled());

    scheduler
        .handle(ClusterEvent::Offers { offers: offers() })
        .unwrap();

    let accepts = scheduler.driver().accepts();
    assert_eq!(accepts.len(), 1);
    let (offer_ids, operations) = accepts[0];
    assert_eq!(offer_ids, &[OfferId::new("offer-1")][..]);
    assert_eq!(operations.len(), 1);
    assert_eq!(operations[0].operation_type(), OperationType::Unreserve);
    let Operation::Unreserve { resources } = &operations[0] else {
        panic!("expected unreserve");
    };
    assert_eq!(
        resources[0].resource_id().map(|id| id.as_str()),
        Some("orphan")
    );

    assert_eq!(scheduler.driver().declines(), vec![&OfferId::new("offer-2")]);
    assert_eq!(recorder.unreserves().len(), 1);
}

#[test]
fn test_failed_cleanup_still_cleans_other_agents_and_declines() {
    let clock = ManualClock::new(1_000);
    let driver = RecordingDriver::new().rejecting_offer(OfferId::new("offer-a"));
    let mut scheduler = scheduler_with(&clock, driver);
    scheduler.set_requirements(&requirements());
    scheduler.handle(registered(&[])).unwrap();

    let offers = vec![
        fixtures::offer_on("offer-a", "agent-a", vec![fixtures::reserved_cpus(1.0, "orphan-a")]),
        fixtures::offer_on("offer-b", "agent-b", vec![fixtures::reserved_cpus(1.0, "orphan-b")]),
        fixtures::offer_on("offer-c", "agent-c", vec![Resource::cpus(1.0)]),
    ];
    let err = scheduler
        .handle(ClusterEvent::Offers { offers })
        .unwrap_err();
    assert!(matches!(err, SchedulerError::Offer(ref e) if e.is_transport()));

    let accepted: Vec<_> = scheduler
        .driver()
        .accepts()
        .into_iter()
        .map(|(ids, _)| ids.to_vec())
        .collect();
    assert_eq!(
        accepted,
        vec![vec![OfferId::new("offer-a")], vec![OfferId::new("offer-b")]]
    );
    assert_eq!(
        scheduler.driver().declines(),
        vec![&OfferId::new("offer-a"), &OfferId::new("offer-c")]
    );
}

#[test]
fn test_no_cleanup_without_requirements() {
    let clock = ManualClock::new(1_000);
    let mut scheduler = scheduler(&clock);

    scheduler.handle(registered(&[])).unwrap();
    scheduler
        .handle(ClusterEvent::Offers { offers: offers() })
        .unwrap();

    assert!(scheduler.driver().accepts().is_empty());
    assert_eq!(scheduler.driver().declines().len(), 2);
}

#[test]
fn test_explicit_reconciliation_retried_after_interval() {
    let clock = ManualClock::new(1_000);
    let mut scheduler = scheduler(&clock);

    scheduler.handle(registered(&["t-1", "t-2"])).unwrap();
    scheduler.tick().unwrap();
    assert_eq!(scheduler.driver().reconciles().len(), 1);

    clock.advance(ReconcilerConfig::default().min_interval.as_millis() as u64);
    scheduler.tick().unwrap();
    assert_eq!(scheduler.driver().reconciles().len(), 2);
    assert_eq!(scheduler.driver().reconciles()[1].len(), 2);
}

#[test]
fn test_operator_commands_drive_plan() {
    let clock = ManualClock::new(0);
    let mut scheduler = scheduler(&clock);
    let plan = Plan::new(
        "deploy",
        vec![Phase::new(
            "brokers",
            vec![Block::new("broker-0"), Block::new("broker-1")],
        )],
    );
    let phase_id = plan.phase(0).unwrap().id();
    let block0 = plan.phase(0).unwrap().block(0).unwrap().id();
    scheduler.load_plan(PlanManager::staged(plan));

    let operator = |command| ClusterEvent::Operator { command };

    scheduler.handle(operator(OperatorCommand::Proceed)).unwrap();
    let manager = scheduler.plan().unwrap();
    assert_eq!(manager.current_block().map(Block::id), Some(block0));
    assert_eq!(manager.status(), Status::Pending);

    scheduler
        .handle(operator(OperatorCommand::ForceComplete {
            phase_id,
            block_id: block0,
        }))
        .unwrap();
    assert_eq!(scheduler.plan().unwrap().status(), Status::Waiting);

    scheduler
        .handle(operator(OperatorCommand::Restart {
            phase_id,
            block_id: block0,
        }))
        .unwrap();
    // The restarted block is still the selected one.
    assert_eq!(scheduler.plan().unwrap().status(), Status::Pending);

    scheduler.handle(operator(OperatorCommand::Proceed)).unwrap();
    assert_eq!(
        scheduler.plan().unwrap().current_block().map(Block::id),
        Some(block0)
    );
}

#[tokio::test]
async fn test_run_handles_events_until_channel_closes() {
    let clock = ManualClock::new(1_000);
    let scheduler = scheduler(&clock).with_tick_interval(Duration::from_secs(3600));
    let (events_tx, events_rx) = mpsc::channel(8);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(scheduler.run(events_rx, shutdown_rx));

    events_tx.send(registered(&["t-1"])).await.unwrap();
    events_tx
        .send(ClusterEvent::StatusUpdate {
            status: fixtures::status("t-1", TaskState::Finished),
        })
        .await
        .unwrap();
    drop(events_tx);

    let scheduler = handle.await.unwrap();
    assert!(scheduler.reconciler().remaining().is_empty());
    assert_eq!(scheduler.framework_id(), Some(&fixtures::framework_id()));
}

#[tokio::test]
async fn test_run_stops_on_shutdown() {
    let clock = ManualClock::new(1_000);
    let scheduler = scheduler(&clock).with_tick_interval(Duration::from_secs(3600));
    let (_events_tx, events_rx) = mpsc::channel(8);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(scheduler.run(events_rx, shutdown_rx));
    shutdown_tx.send(true).unwrap();

    let scheduler = handle.await.unwrap();
    // The first tick fires immediately and finds nothing to reconcile.
    assert!(scheduler.driver().reconciles().is_empty());
}
