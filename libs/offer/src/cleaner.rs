//! Detecting reservations and volumes nobody claims any more.

use std::collections::HashSet;

use stagehand_id::{PersistenceId, ResourceId};
use stagehand_model::{Offer, Resource};

use crate::recommendation::OfferRecommendation;
use crate::requirement::OfferRequirement;

/// Compares offered resources against the ones the scheduler still expects
/// to own.
#[derive(Debug, Clone, Default)]
pub struct ResourceCleaner {
    expected_resource_ids: HashSet<ResourceId>,
    expected_persistence_ids: HashSet<PersistenceId>,
}

impl ResourceCleaner {
    /// Creates a cleaner that keeps everything in `expected`.
    pub fn new<'a>(expected: impl IntoIterator<Item = &'a Resource>) -> Self {
        let mut cleaner = Self::default();
        for resource in expected {
            if let Some(id) = resource.resource_id() {
                cleaner.expected_resource_ids.insert(id.clone());
            }
            if let Some(id) = resource.persistence_id() {
                cleaner.expected_persistence_ids.insert(id.clone());
            }
        }
        cleaner
    }

    /// Creates a cleaner that keeps everything any requirement references.
    pub fn from_requirements(requirements: &[OfferRequirement]) -> Self {
        Self {
            expected_resource_ids: requirements
                .iter()
                .flat_map(|r| r.resource_ids().iter().cloned())
                .collect(),
            expected_persistence_ids: requirements
                .iter()
                .flat_map(|r| r.persistence_ids().iter().cloned())
                .collect(),
        }
    }

    /// Returns Destroy and Unreserve recommendations for every unclaimed
    /// volume and reservation in `offers`.
    ///
    /// All destroys come before all unreserves, so a volume is always
    /// destroyed before its disk reservation is released.
    pub fn evaluate(&self, offers: &[Offer]) -> Vec<OfferRecommendation> {
        let mut destroys = Vec::new();
        let mut unreserves = Vec::new();

        for offer in offers {
            for resource in offer.reserved_resources() {
                let volume_expected = match resource.persistence_id() {
                    Some(id) if self.expected_persistence_ids.contains(id) => true,
                    Some(_) => {
                        destroys.push(OfferRecommendation::destroy(offer, resource));
                        false
                    }
                    None => false,
                };

                // A claimed volume keeps its reservation whatever its
                // reservation id says.
                if volume_expected {
                    continue;
                }
                if let Some(id) = resource.resource_id() {
                    if !self.expected_resource_ids.contains(id) {
                        unreserves.push(OfferRecommendation::unreserve(offer, resource.clone()));
                    }
                }
            }
        }

        destroys.extend(unreserves);
        destroys
    }

    pub fn expects_resource(&self, id: &ResourceId) -> bool {
        self.expected_resource_ids.contains(id)
    }

    pub fn expects_volume(&self, id: &PersistenceId) -> bool {
        self.expected_persistence_ids.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use stagehand_model::{OperationType, Resource};
    use stagehand_testing::fixtures;

    use super::*;

    fn kinds(recs: &[OfferRecommendation]) -> Vec<OperationType> {
        recs.iter().map(OfferRecommendation::operation_type).collect()
    }

    #[test]
    fn test_unreserved_resources_are_ignored() {
        let cleaner = ResourceCleaner::default();
        let offer = fixtures::offer(vec![Resource::cpus(1.0), Resource::mem(512.0)]);
        assert!(cleaner.evaluate(&[offer]).is_empty());
    }

    #[test]
    fn test_expected_resources_are_kept() {
        let cpu = fixtures::reserved_cpus(1.0, "keep");
        let volume = fixtures::volume(100.0, "keep-vol-res", "keep-vol");
        let cleaner = ResourceCleaner::new([&cpu, &volume]);

        let offer = fixtures::offer(vec![cpu, volume]);
        assert!(cleaner.evaluate(&[offer]).is_empty());
    }

    #[test]
    fn test_unexpected_reservation_is_unreserved() {
        let cleaner = ResourceCleaner::default();
        let offer = fixtures::offer(vec![fixtures::reserved_cpus(1.0, "orphan")]);

        let recs = cleaner.evaluate(&[offer]);
        assert_eq!(kinds(&recs), vec![OperationType::Unreserve]);
    }

    #[test]
    fn test_unexpected_volume_is_destroyed_then_unreserved() {
        let cleaner = ResourceCleaner::default();
        let offer = fixtures::offer(vec![
            fixtures::volume(100.0, "vol-res", "vol"),
            fixtures::reserved_cpus(1.0, "cpu-res"),
        ]);

        let recs = cleaner.evaluate(&[offer]);
        assert_eq!(
            kinds(&recs),
            vec![
                OperationType::Destroy,
                OperationType::Unreserve,
                OperationType::Unreserve,
            ]
        );
    }

    #[test]
    fn test_claimed_volume_with_unknown_reservation_is_kept() {
        let claimed = fixtures::volume(100.0, "known-res", "vol");
        let cleaner = ResourceCleaner::new([&claimed]);
        let offered = fixtures::volume(100.0, "other-res", "vol");

        let recs = cleaner.evaluate(&[fixtures::offer(vec![offered])]);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_from_requirements() {
        let cpu = fixtures::reserved_cpus(1.0, "req-res");
        let requirement =
            OfferRequirement::from_tasks(vec![fixtures::task("t", vec![cpu.clone()])]).unwrap();
        let cleaner = ResourceCleaner::from_requirements(&[requirement]);

        assert!(cleaner.expects_resource(&ResourceId::new("req-res")));
        let offer = fixtures::offer(vec![cpu, fixtures::reserved_cpus(1.0, "stale")]);
        let recs = cleaner.evaluate(&[offer]);
        assert_eq!(recs.len(), 1);
        assert_eq!(
            recs[0].operation(),
            &stagehand_model::Operation::Unreserve {
                resources: vec![fixtures::reserved_cpus(1.0, "stale")]
            }
        );
    }
}
