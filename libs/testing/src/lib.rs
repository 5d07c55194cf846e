//! Test support for the stagehand crates.
//!
//! - [`RecordingDriver`]: a `SchedulerDriver` that records every call and can
//!   be told to fail
//! - [`ManualClock`]: a settable clock shared between a test and the code
//!   under test
//! - [`TestOperationRecorder`]: an `OperationRecorder` that sorts recorded
//!   operations by kind
//! - [`fixtures`]: canned offers, resources and tasks

pub mod fixtures;

mod clock;
mod driver;
mod recorder;

pub use clock::ManualClock;
pub use driver::{DriverCall, RecordingDriver};
pub use recorder::TestOperationRecorder;
