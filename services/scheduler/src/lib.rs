//! stagehand scheduler service library.
//!
//! Wires the scheduler core into one serial control loop:
//!
//! - **Offers**: declined while task reconciliation is incomplete; otherwise
//!   orphaned reservations and volumes are cleaned up and every unused offer
//!   is declined
//! - **Status updates**: fed to the task reconciler
//! - **Ticks**: re-run reconciliation, which throttles itself
//! - **Operator commands**: drive the loaded rollout plan

pub mod config;
pub mod driver;
pub mod event;
pub mod scheduler;

pub use config::Config;
pub use driver::DryRunDriver;
pub use event::{ClusterEvent, OperatorCommand};
pub use scheduler::{Scheduler, SchedulerError, SchedulerResult};
