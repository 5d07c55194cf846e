//! Errors reported by cluster collaborators.

use std::time::Duration;

use thiserror::Error;

/// Failure reported by the cluster transport.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DriverError {
    /// The cluster rejected the call.
    #[error("rejected by cluster: {0}")]
    Rejected(String),

    /// The driver is not connected to the cluster.
    #[error("driver not connected")]
    Disconnected,

    /// The call did not complete in time.
    #[error("driver call timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure reported by an operation recorder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The recorder cannot classify this operation.
    #[error("unknown operation type: {0}")]
    UnknownOperation(String),

    /// The recorder failed to store the operation.
    #[error("recorder failure: {0}")]
    Failed(String),
}
