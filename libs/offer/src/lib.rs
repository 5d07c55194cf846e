//! # stagehand-offer
//!
//! Deciding what to do with offers, and doing it.
//!
//! ```text
//! offers ──► ResourceCleanerScheduler ──► ResourceCleaner::evaluate
//!                     │                         │
//!                     │ one batch per agent ◄───┘ Destroy/Unreserve
//!                     ▼
//!               OfferAccepter ──► OperationRecorder (every operation)
//!                     │
//!                     └─────────► SchedulerDriver::accept_offers
//! ```
//!
//! ## Invariants
//!
//! - An accept call only ever spans offers from one agent
//! - Every processed operation is recorded, whether or not it is submitted
//! - Transient launches are recorded but never submitted
//! - A volume is destroyed before its reservation is released

mod accepter;
mod cleaner;
mod cleaner_scheduler;
mod error;
mod recommendation;
mod recorder;
mod requirement;

pub use accepter::OfferAccepter;
pub use cleaner::ResourceCleaner;
pub use cleaner_scheduler::{CleanupReport, ResourceCleanerScheduler};
pub use error::{OfferError, OfferResult};
pub use recommendation::OfferRecommendation;
pub use recorder::LoggingRecorder;
pub use requirement::{ExecutorRequirement, OfferRequirement, TaskRequirement};
