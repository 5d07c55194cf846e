//! # stagehand-plan
//!
//! Staged rollout plans.
//!
//! A [`Plan`] is an ordered list of [`Phase`]s; a phase is an ordered list of
//! [`Block`]s, the smallest unit of rollout work. A [`PhaseStrategy`] decides
//! which block of a phase may run next. The [`PlanManager`] pairs each phase
//! with its strategy and is what a driver loop or operator talks to.
//!
//! ## Ownership
//!
//! Blocks are owned by their phase and phases by their plan. Strategies hold
//! only a cursor (an index) and are handed the phase on every call, so there
//! is exactly one copy of each block's status.
//!
//! ## Status
//!
//! Status is never stored above the block. A phase's status comes from its
//! blocks and whether its strategy has one selected; the plan's comes from
//! its phase statuses and whether any block is selected. Both go through
//! [`Status::progress`].

mod block;
mod error;
mod manager;
mod phase;
mod plan;
mod status;
mod strategy;

pub use block::Block;
pub use error::{PlanError, PlanResult};
pub use manager::PlanManager;
pub use phase::Phase;
pub use plan::Plan;
pub use status::Status;
pub use strategy::{InstallStrategy, PhaseStrategy, StageStrategy};
