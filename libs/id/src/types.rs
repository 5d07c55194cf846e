//! The ID types.

use crate::{define_id, define_opaque_id};

// Assigned by the cluster.

define_opaque_id!(
    /// A machine offering resources.
    AgentId
);
define_opaque_id!(FrameworkId);
define_opaque_id!(OfferId);
define_opaque_id!(TaskId);
define_opaque_id!(ExecutorId);
define_opaque_id!(
    /// Identifies one dynamic reservation.
    ResourceId
);
define_opaque_id!(
    /// Identifies one persistent volume.
    PersistenceId
);

// Minted by the scheduler.

define_id!(PlanId, "pln");
define_id!(PhaseId, "phs");
define_id!(BlockId, "blk");
