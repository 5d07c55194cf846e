//! Tests for per-agent cleanup batching.

use std::collections::HashSet;

use proptest::prelude::*;
use stagehand_id::{AgentId, OfferId};
use stagehand_model::{Offer, OperationType, Resource};
use stagehand_offer::{
    OfferAccepter, OfferRecommendation, ResourceCleaner, ResourceCleanerScheduler,
};
use stagehand_testing::{fixtures, RecordingDriver, TestOperationRecorder};

fn offers() -> Vec<Offer> {
    vec![
        fixtures::offer_on(
            "A",
            "A",
            vec![
                fixtures::volume(100.0, "vol-res-a", "vol-a"),
                fixtures::reserved_cpus(1.0, "cpu-a"),
            ],
        ),
        fixtures::offer_on(
            "B",
            "B",
            vec![
                fixtures::volume(100.0, "vol-res-b", "vol-b"),
                fixtures::reserved_cpus(1.0, "cpu-b"),
            ],
        ),
    ]
}

fn recommendations() -> Vec<OfferRecommendation> {
    let offers = offers();
    let (a, b) = (&offers[0], &offers[1]);
    vec![
        OfferRecommendation::destroy(a, &Resource::cpus(1.0)),
        OfferRecommendation::destroy(b, &Resource::cpus(1.0)),
        OfferRecommendation::unreserve(a, Resource::cpus(1.0)),
        OfferRecommendation::unreserve(b, Resource::cpus(1.0)),
    ]
}

#[test]
fn test_resource_offers_one_accept_per_agent() {
    let recorder = TestOperationRecorder::new();
    let mut scheduler = ResourceCleanerScheduler::new(
        ResourceCleaner::default(),
        OfferAccepter::new(recorder.clone()),
    );
    let mut driver = RecordingDriver::new();

    let accepted = scheduler
        .resource_offers(&mut driver, &offers())
        .into_result()
        .unwrap();

    assert_eq!(driver.accepts().len(), 2);
    assert_eq!(accepted.len(), 2);
    for (offer_ids, operations) in driver.accepts() {
        assert_eq!(offer_ids.len(), 1);
        let kinds: Vec<_> = operations.iter().map(|op| op.operation_type()).collect();
        assert_eq!(
            kinds,
            vec![
                OperationType::Destroy,
                OperationType::Unreserve,
                OperationType::Unreserve
            ]
        );
    }
    assert_eq!(recorder.destroys().len(), 2);
    assert_eq!(recorder.unreserves().len(), 4);
}

#[test]
fn test_resource_offers_nothing_to_clean() {
    let offers = offers();
    let expected: Vec<&Resource> = offers.iter().flat_map(|o| o.resources.iter()).collect();
    let mut scheduler = ResourceCleanerScheduler::new(
        ResourceCleaner::new(expected),
        OfferAccepter::new(TestOperationRecorder::new()),
    );
    let mut driver = RecordingDriver::new();

    let accepted = scheduler
        .resource_offers(&mut driver, &offers)
        .into_result()
        .unwrap();

    assert!(accepted.is_empty());
    assert!(driver.calls().is_empty());
}

#[test]
fn test_failed_agent_does_not_stop_the_others() {
    let mut scheduler = ResourceCleanerScheduler::new(
        ResourceCleaner::default(),
        OfferAccepter::new(TestOperationRecorder::new()),
    );
    let mut driver = RecordingDriver::new().rejecting_offer(OfferId::new("A"));

    let report = scheduler.resource_offers(&mut driver, &offers());

    assert_eq!(driver.accepts().len(), 2);
    assert_eq!(report.accepted, vec![OfferId::new("B")]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, AgentId::new("A"));
    assert!(report.failures[0].1.is_transport());
    assert!(!report.is_success());
    assert!(report.into_result().unwrap_err().is_transport());
}

#[test]
fn test_group_recommendations_by_agent() {
    let groups = ResourceCleanerScheduler::group_by_agent(recommendations());

    assert_eq!(groups.len(), 2);
    for (agent_id, recs) in &groups {
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.agent_id() == agent_id));
        assert_eq!(recs[0].operation_type(), OperationType::Destroy);
        assert_eq!(recs[1].operation_type(), OperationType::Unreserve);
    }
}

proptest! {
    #[test]
    fn test_grouping_is_a_partition(agents in proptest::collection::vec(0u8..5, 0..40)) {
        let recs: Vec<OfferRecommendation> = agents
            .iter()
            .enumerate()
            .map(|(i, agent)| {
                let offer = fixtures::offer_on(
                    &format!("offer-{i}"),
                    &format!("agent-{agent}"),
                    vec![],
                );
                OfferRecommendation::reserve(&offer, Resource::cpus(1.0))
            })
            .collect();

        let groups = ResourceCleanerScheduler::group_by_agent(recs.clone());

        let distinct: HashSet<u8> = agents.iter().copied().collect();
        prop_assert_eq!(groups.len(), distinct.len());

        let mut seen = HashSet::new();
        let mut total = 0;
        for (agent_id, group) in &groups {
            for rec in group {
                prop_assert_eq!(rec.agent_id(), agent_id);
                prop_assert!(seen.insert(rec.offer().id.clone()));
                total += 1;
            }
        }
        prop_assert_eq!(total, recs.len());
    }
}
