//! Applying recommendations against offers.

use stagehand_id::OfferId;
use stagehand_model::{Filters, Operation, OperationRecorder, SchedulerDriver};
use tracing::{debug, info};

use crate::error::{OfferError, OfferResult};
use crate::recommendation::OfferRecommendation;
use crate::recorder::LoggingRecorder;

/// Submits batches of recommendations through the driver.
///
/// Every operation in a batch is handed to every recorder first; a recorder
/// failure aborts the batch before anything reaches the cluster. Transient
/// launches stop there. Everything else goes out in a single accept call
/// naming each offer that contributed an operation.
pub struct OfferAccepter {
    recorders: Vec<Box<dyn OperationRecorder>>,
    filters: Filters,
}

impl OfferAccepter {
    /// Creates an accepter with one recorder.
    pub fn new(recorder: impl OperationRecorder + 'static) -> Self {
        Self::with_recorders(vec![Box::new(recorder)])
    }

    /// Creates an accepter that notifies each recorder in order.
    pub fn with_recorders(recorders: Vec<Box<dyn OperationRecorder>>) -> Self {
        Self {
            recorders,
            filters: Filters::default(),
        }
    }

    /// Overrides the filters sent with each accept call.
    #[must_use]
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// Records and submits `recommendations`.
    ///
    /// All recommendations must target offers on the same agent. Returns the
    /// ids of the offers consumed, which is empty when nothing needed
    /// submitting.
    pub fn accept<D>(
        &mut self,
        driver: &mut D,
        recommendations: &[OfferRecommendation],
    ) -> OfferResult<Vec<OfferId>>
    where
        D: SchedulerDriver + ?Sized,
    {
        let Some(first) = recommendations.first() else {
            return Ok(Vec::new());
        };
        if let Some(other) = recommendations
            .iter()
            .find(|r| r.agent_id() != first.agent_id())
        {
            return Err(OfferError::MixedAgents {
                first: first.agent_id().clone(),
                second: other.agent_id().clone(),
            });
        }

        for recommendation in recommendations {
            for recorder in &mut self.recorders {
                recorder.record(recommendation.operation(), recommendation.offer())?;
            }
        }

        let mut offer_ids: Vec<OfferId> = Vec::new();
        let mut operations: Vec<Operation> = Vec::new();
        for recommendation in recommendations {
            let operation = recommendation.operation();
            if operation.is_transient_launch() {
                debug!(
                    offer_id = %recommendation.offer().id,
                    detail = %operation,
                    "Skipping submission of transient launch"
                );
                continue;
            }
            let offer_id = &recommendation.offer().id;
            if !offer_ids.contains(offer_id) {
                offer_ids.push(offer_id.clone());
            }
            operations.push(operation.clone());
        }

        if operations.is_empty() {
            return Ok(Vec::new());
        }

        driver.accept_offers(&offer_ids, &operations, &self.filters)?;
        info!(
            agent_id = %first.agent_id(),
            offers = offer_ids.len(),
            operations = operations.len(),
            "Accepted offers"
        );

        Ok(offer_ids)
    }
}

impl Default for OfferAccepter {
    fn default() -> Self {
        Self::new(LoggingRecorder)
    }
}

impl std::fmt::Debug for OfferAccepter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfferAccepter")
            .field("recorders", &self.recorders.len())
            .field("filters", &self.filters)
            .finish()
    }
}
