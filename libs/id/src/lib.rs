//! # stagehand-id
//!
//! Typed IDs for the stagehand scheduler core.
//!
//! Two kinds exist, each as distinct newtypes so an `OfferId` can never be
//! passed where an `AgentId` is expected:
//!
//! - IDs the cluster assigns (agents, offers, tasks, reservations, volumes)
//!   are opaque strings. The core compares and forwards them and nothing
//!   else.
//! - IDs the scheduler mints for plan elements are prefixed ULIDs such as
//!   `blk_01HV4Z2WQXKJNM8GPQY6VBKC3D`.

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;
pub use ulid::Ulid;
