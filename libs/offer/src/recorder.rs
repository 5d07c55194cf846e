use stagehand_model::{Offer, Operation, OperationRecorder, RecordError};
use tracing::info;

/// Records operations to the log.
///
/// The default recorder when no other audit sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingRecorder;

impl OperationRecorder for LoggingRecorder {
    fn record(&mut self, operation: &Operation, offer: &Offer) -> Result<(), RecordError> {
        info!(
            operation = %operation.operation_type(),
            offer_id = %offer.id,
            agent_id = %offer.agent_id,
            transient = operation.is_transient_launch(),
            detail = %operation,
            "Recorded operation"
        );
        Ok(())
    }
}
