//! # stagehand-model
//!
//! Value types the scheduler core reasons about, and the interfaces of the
//! collaborators it talks to.
//!
//! ## Design Principles
//!
//! - Offers are immutable snapshots supplied by the cluster; nothing here
//!   mutates one
//! - A persistent volume is always reserved; the type makes the other case
//!   unrepresentable
//! - Operations are a closed set, so every consumer can match exhaustively
//! - Transport, recording and time are traits, injected where needed
//!
//! Wire encoding of these types is the transport's business. They are
//! `serde`-serializable so a persistence collaborator can store them.

mod driver;
mod error;
mod offer;
mod operation;
mod resource;
mod task;

pub use driver::{Clock, OperationRecorder, SchedulerDriver, SystemClock};
pub use error::{DriverError, RecordError};
pub use offer::{Filters, Offer};
pub use operation::{Operation, OperationType};
pub use resource::{Reservation, Resource, ResourceValue, ValueRange, Volume, UNRESERVED_ROLE};
pub use task::{ExecutorInfo, TaskInfo, TaskState, TaskStatus, TRANSIENT_LABEL};
