//! Cluster resources.
//!
//! A [`Resource`] is a quantity of one kind (cpus, mem, disk, ports) held
//! under a role. Reserved resources carry a [`Reservation`]; a persistent
//! volume is a reservation that also carries a [`Volume`], which is how the
//! "volumes are always reserved" invariant is enforced by construction.

use std::fmt;

use serde::{Deserialize, Serialize};
use stagehand_id::{PersistenceId, ResourceId};

/// Role of resources that are not reserved for anyone.
pub const UNRESERVED_ROLE: &str = "*";

/// An inclusive range of values, used for ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub begin: u64,
    pub end: u64,
}

/// Quantity carried by a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceValue {
    Scalar(f64),
    Ranges(Vec<ValueRange>),
}

/// A persistent volume living on a reserved disk resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub persistence_id: PersistenceId,
    pub container_path: String,
}

/// Reservation metadata attached to a reserved resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub principal: String,
    pub resource_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Volume>,
}

/// A single cluster resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    name: String,
    value: ResourceValue,
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reservation: Option<Reservation>,
    #[serde(default)]
    revocable: bool,
}

impl Resource {
    /// An unreserved scalar resource.
    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: ResourceValue::Scalar(value),
            role: UNRESERVED_ROLE.to_string(),
            reservation: None,
            revocable: false,
        }
    }

    /// Unreserved cpus.
    pub fn cpus(value: f64) -> Self {
        Self::scalar("cpus", value)
    }

    /// Unreserved memory, in megabytes.
    pub fn mem(megabytes: f64) -> Self {
        Self::scalar("mem", megabytes)
    }

    /// Unreserved disk, in megabytes.
    pub fn disk(megabytes: f64) -> Self {
        Self::scalar("disk", megabytes)
    }

    /// Unreserved port ranges.
    pub fn ports(ranges: Vec<ValueRange>) -> Self {
        Self {
            name: "ports".to_string(),
            value: ResourceValue::Ranges(ranges),
            role: UNRESERVED_ROLE.to_string(),
            reservation: None,
            revocable: false,
        }
    }

    /// A scalar resource reserved for `role`.
    pub fn reserved_scalar(
        name: impl Into<String>,
        value: f64,
        role: impl Into<String>,
        principal: impl Into<String>,
        resource_id: ResourceId,
    ) -> Self {
        Self {
            name: name.into(),
            value: ResourceValue::Scalar(value),
            role: role.into(),
            reservation: Some(Reservation {
                principal: principal.into(),
                resource_id,
                volume: None,
            }),
            revocable: false,
        }
    }

    /// Reserved cpus.
    pub fn reserved_cpus(
        value: f64,
        role: impl Into<String>,
        principal: impl Into<String>,
        resource_id: ResourceId,
    ) -> Self {
        Self::reserved_scalar("cpus", value, role, principal, resource_id)
    }

    /// A persistent volume on reserved disk.
    pub fn volume(
        megabytes: f64,
        role: impl Into<String>,
        principal: impl Into<String>,
        resource_id: ResourceId,
        persistence_id: PersistenceId,
        container_path: impl Into<String>,
    ) -> Self {
        Self {
            name: "disk".to_string(),
            value: ResourceValue::Scalar(megabytes),
            role: role.into(),
            reservation: Some(Reservation {
                principal: principal.into(),
                resource_id,
                volume: Some(Volume {
                    persistence_id,
                    container_path: container_path.into(),
                }),
            }),
            revocable: false,
        }
    }

    /// Marks the resource as revocable.
    #[must_use]
    pub fn into_revocable(mut self) -> Self {
        self.revocable = true;
        self
    }

    /// A copy of this resource with the revocable marker removed.
    #[must_use]
    pub fn without_revocable(&self) -> Self {
        Self {
            revocable: false,
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &ResourceValue {
        &self.value
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn reservation(&self) -> Option<&Reservation> {
        self.reservation.as_ref()
    }

    /// The reservation id, if reserved.
    pub fn resource_id(&self) -> Option<&ResourceId> {
        self.reservation.as_ref().map(|r| &r.resource_id)
    }

    /// The persistence id, if this is a persistent volume.
    pub fn persistence_id(&self) -> Option<&PersistenceId> {
        self.reservation
            .as_ref()
            .and_then(|r| r.volume.as_ref())
            .map(|v| &v.persistence_id)
    }

    pub fn is_reserved(&self) -> bool {
        self.reservation.is_some()
    }

    pub fn is_volume(&self) -> bool {
        self.persistence_id().is_some()
    }

    pub fn is_revocable(&self) -> bool {
        self.revocable
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}

impl fmt::Display for ResourceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceValue::Scalar(v) => write!(f, "{v}"),
            ResourceValue::Ranges(ranges) => {
                f.write_str("[")?;
                for (i, range) in ranges.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{range}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}):{}", self.name, self.role, self.value)?;
        if let Some(reservation) = &self.reservation {
            write!(f, " resource_id={}", reservation.resource_id)?;
            if let Some(volume) = &reservation.volume {
                write!(
                    f,
                    " persistence_id={} path={}",
                    volume.persistence_id, volume.container_path
                )?;
            }
        }
        if self.revocable {
            f.write_str(" revocable")?;
        }
        Ok(())
    }
}
