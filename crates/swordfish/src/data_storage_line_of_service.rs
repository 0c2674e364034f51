//! Data storage line of service: access, provisioning and recovery
//! characteristics offered to consumers of a storage service.

use redfish_core::link::null_as_default;
use redfish_core::{Entity, MutableField, Resource, Snapshot, Updatable};
use serde::{Deserialize, Serialize};

/// Kinds of access a storage consumer may be granted.
///
/// Values without a dedicated variant are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageAccessCapability {
    /// Read access
    Read,
    /// Write access
    Write,
    /// Write once, read many
    WriteOnce,
    /// Append only
    Append,
    /// Streaming access
    Streaming,
    /// Execute access
    Execute,
    /// Any other capability name
    #[serde(untagged)]
    Other(String),
}

/// How storage capacity is allocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvisioningPolicy {
    /// Capacity is allocated up front
    Fixed,
    /// Capacity is allocated on demand
    Thin,
    /// Any other policy name
    #[serde(untagged)]
    Other(String),
}

/// How quickly data becomes accessible again after a recovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryAccessScope {
    /// Access is synchronous and immediate
    OnlineActive,
    /// Access requires a failover but no restore
    OnlinePassive,
    /// Access may take minutes, e.g. from tape in a library
    Nearline,
    /// Access requires operator intervention
    Offline,
    /// Any other scope name
    #[serde(untagged)]
    Other(String),
}

/// A data storage line of service.
///
/// Every capability field except the description is writable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataStorageLineOfService {
    /// Resource identity
    #[serde(flatten)]
    pub entity: Entity,
    /// OData context
    #[serde(rename = "@odata.context", default, skip_serializing_if = "String::is_empty")]
    pub odata_context: String,
    /// OData type
    #[serde(rename = "@odata.type", default)]
    pub odata_type: String,
    /// Access granted to consumers of this line of service
    #[serde(rename = "AccessCapabilities", default, deserialize_with = "null_as_default")]
    pub access_capabilities: Vec<StorageAccessCapability>,
    /// Description of this resource
    #[serde(rename = "Description", default)]
    pub description: String,
    /// Whether compression or deduplication is in use
    #[serde(rename = "IsSpaceEfficient", default, deserialize_with = "null_as_default")]
    pub is_space_efficient: bool,
    /// OEM extensions
    #[serde(rename = "Oem", default, skip_serializing_if = "serde_json::Value::is_null")]
    pub oem: serde_json::Value,
    /// How capacity is allocated
    #[serde(rename = "ProvisioningPolicy", default)]
    pub provisioning_policy: Option<ProvisioningPolicy>,
    /// Number of additional copies from which capacity can be recovered
    #[serde(rename = "RecoverableCapacitySourceCount", default, deserialize_with = "null_as_default")]
    pub recoverable_capacity_source_count: u32,
    /// Expected access after a recovery
    #[serde(rename = "RecoveryTimeObjectives", default)]
    pub recovery_time_objectives: Option<RecoveryAccessScope>,
    #[serde(skip)]
    snapshot: Snapshot,
}

impl DataStorageLineOfService {
    /// Returns true if consumers may write to storage under this line of service.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.access_capabilities.iter().any(|capability| {
            matches!(
                capability,
                StorageAccessCapability::Write
                    | StorageAccessCapability::WriteOnce
                    | StorageAccessCapability::Append
            )
        })
    }
}

impl Resource for DataStorageLineOfService {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn snapshot_mut(&mut self) -> Option<&mut Snapshot> {
        Some(&mut self.snapshot)
    }
}

impl Updatable for DataStorageLineOfService {
    const MUTABLE_FIELDS: &'static [MutableField<Self>] = redfish_core::mutable_fields!(DataStorageLineOfService {
        "AccessCapabilities" => access_capabilities,
        "IsSpaceEfficient" => is_space_efficient,
        "ProvisioningPolicy" => provisioning_policy,
        "RecoverableCapacitySourceCount" => recoverable_capacity_source_count,
        "RecoveryTimeObjectives" => recovery_time_objectives,
    });

    fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}
