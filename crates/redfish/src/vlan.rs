//! Virtual LAN settings of a network interface.

use redfish_core::{Entity, MutableField, Resource, Snapshot, Updatable};
use serde::{Deserialize, Serialize};

/// VLAN attributes embedded in other resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    /// Whether this VLAN is tagged or untagged for the interface
    #[serde(rename = "Tagged", default)]
    pub tagged: bool,
    /// Whether this VLAN is enabled for the interface
    #[serde(rename = "VLANEnable", default)]
    pub vlan_enable: bool,
    /// VLAN identifier
    #[serde(rename = "VLANId", default)]
    pub vlan_id: i16,
    /// VLAN priority (0-7)
    #[serde(rename = "VLANPriority", default)]
    pub vlan_priority: u8,
}

/// A VLAN configured on a network interface.
///
/// `VLANEnable`, `VLANId` and `VLANPriority` are writable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VLanNetworkInterface {
    /// Resource identity
    #[serde(flatten)]
    pub entity: Entity,
    /// OData type
    #[serde(rename = "@odata.type", default)]
    pub odata_type: String,
    /// Description of this resource
    #[serde(rename = "Description", default)]
    pub description: String,
    /// Whether this VLAN is tagged or untagged for the interface
    #[serde(rename = "Tagged", default)]
    pub tagged: bool,
    /// Whether this VLAN is enabled for the interface
    #[serde(rename = "VLANEnable", default)]
    pub vlan_enable: bool,
    /// VLAN identifier
    #[serde(rename = "VLANId", default)]
    pub vlan_id: i16,
    /// VLAN priority (0-7)
    #[serde(rename = "VLANPriority", default)]
    pub vlan_priority: u8,
    #[serde(skip)]
    snapshot: Snapshot,
}

impl VLanNetworkInterface {
    /// The VLAN attributes of this interface.
    #[must_use]
    pub fn vlan(&self) -> Vlan {
        Vlan {
            tagged: self.tagged,
            vlan_enable: self.vlan_enable,
            vlan_id: self.vlan_id,
            vlan_priority: self.vlan_priority,
        }
    }
}

impl Resource for VLanNetworkInterface {
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

impl Updatable for VLanNetworkInterface {
    const MUTABLE_FIELDS: &'static [MutableField<Self>] = redfish_core::mutable_fields!(VLanNetworkInterface {
        "VLANEnable" => vlan_enable,
        "VLANId" => vlan_id,
        "VLANPriority" => vlan_priority,
    });

    fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}
