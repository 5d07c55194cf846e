//! Offer-arrival entry point for resource cleanup.

use std::collections::BTreeMap;

use stagehand_id::{AgentId, OfferId};
use stagehand_model::{Offer, SchedulerDriver};
use tracing::{debug, info, warn};

use crate::accepter::OfferAccepter;
use crate::cleaner::ResourceCleaner;
use crate::error::{OfferError, OfferResult};
use crate::recommendation::OfferRecommendation;

/// Outcome of one cleanup pass.
///
/// Agents are independent: a failed accept for one agent does not stop
/// the others, so a pass can both consume offers and fail.
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Offers consumed by successful accepts.
    pub accepted: Vec<OfferId>,
    /// Agents whose accept failed, in agent order.
    pub failures: Vec<(AgentId, OfferError)>,
}

impl CleanupReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// The consumed offers, or the first failure.
    pub fn into_result(self) -> OfferResult<Vec<OfferId>> {
        match self.failures.into_iter().next() {
            Some((_, err)) => Err(err),
            None => Ok(self.accepted),
        }
    }
}

/// Runs the cleaner over each batch of offers and accepts the result, one
/// accept call per agent.
#[derive(Debug)]
pub struct ResourceCleanerScheduler {
    cleaner: ResourceCleaner,
    accepter: OfferAccepter,
}

impl ResourceCleanerScheduler {
    pub fn new(cleaner: ResourceCleaner, accepter: OfferAccepter) -> Self {
        Self { cleaner, accepter }
    }

    /// Replaces the cleaner, e.g. after the set of requirements changed.
    pub fn set_cleaner(&mut self, cleaner: ResourceCleaner) {
        self.cleaner = cleaner;
    }

    pub fn cleaner(&self) -> &ResourceCleaner {
        &self.cleaner
    }

    /// Cleans up unclaimed resources in `offers`.
    ///
    /// Every agent's batch is attempted even if an earlier one fails; failed
    /// agents are retried on the next offer cycle.
    pub fn resource_offers<D>(&mut self, driver: &mut D, offers: &[Offer]) -> CleanupReport
    where
        D: SchedulerDriver + ?Sized,
    {
        let mut report = CleanupReport::default();
        let recommendations = self.cleaner.evaluate(offers);
        if recommendations.is_empty() {
            debug!(offers = offers.len(), "No resources to clean up");
            return report;
        }

        let groups = Self::group_by_agent(recommendations);
        info!(agents = groups.len(), "Cleaning up unclaimed resources");

        for (agent_id, group) in groups {
            debug!(agent_id = %agent_id, recommendations = group.len(), "Accepting cleanup batch");
            match self.accepter.accept(driver, &group) {
                Ok(accepted) => report.accepted.extend(accepted),
                Err(e) => {
                    warn!(agent_id = %agent_id, error = %e, "Cleanup batch failed");
                    report.failures.push((agent_id, e));
                }
            }
        }

        report
    }

    /// Partitions recommendations by the agent of their offer, preserving
    /// order within each partition.
    pub fn group_by_agent(
        recommendations: Vec<OfferRecommendation>,
    ) -> BTreeMap<AgentId, Vec<OfferRecommendation>> {
        let mut groups: BTreeMap<AgentId, Vec<OfferRecommendation>> = BTreeMap::new();
        for recommendation in recommendations {
            groups
                .entry(recommendation.agent_id().clone())
                .or_default()
                .push(recommendation);
        }
        groups
    }
}
