//! Capabilities a storage service advertises for IO connectivity lines of
//! service.

use redfish_core::common::Identifier;
use redfish_core::link::null_as_default;
use redfish_core::{Entity, MutableField, Resource, Snapshot, Updatable};
use serde::{Deserialize, Serialize};

/// Protocol used to reach storage.
///
/// Protocols without a dedicated variant are kept verbatim in
/// [`Protocol::Other`] so they are written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// PCI Express
    #[serde(rename = "PCIe")]
    Pcie,
    /// Serial Attached SCSI
    #[serde(rename = "SAS")]
    Sas,
    /// Serial AT Attachment
    #[serde(rename = "SATA")]
    Sata,
    /// Non-Volatile Memory Express
    #[serde(rename = "NVMe")]
    Nvme,
    /// NVMe over Fabrics
    #[serde(rename = "NVMeOverFabrics")]
    NvmeOverFabrics,
    /// Internet SCSI
    #[serde(rename = "iSCSI")]
    Iscsi,
    /// Fibre Channel
    #[serde(rename = "FC")]
    Fc,
    /// Fibre Channel over Ethernet
    #[serde(rename = "FCoE")]
    Fcoe,
    /// Network File System version 3
    #[serde(rename = "NFSv3")]
    Nfsv3,
    /// Network File System version 4
    #[serde(rename = "NFSv4")]
    Nfsv4,
    /// Server Message Block
    #[serde(rename = "SMB")]
    Smb,
    /// Hypertext Transfer Protocol
    #[serde(rename = "HTTP")]
    Http,
    /// HTTP over TLS
    #[serde(rename = "HTTPS")]
    Https,
    /// RDMA over Converged Ethernet version 2
    #[serde(rename = "RoCEv2")]
    RoceV2,
    /// Internet Wide Area RDMA Protocol
    #[serde(rename = "iWARP")]
    Iwarp,
    /// InfiniBand
    InfiniBand,
    /// OEM specific
    #[serde(rename = "OEM")]
    Oem,
    /// Any other protocol name
    #[serde(untagged)]
    Other(String),
}

/// A line of service the storage service is able to provide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IOConnectivityLineOfService {
    /// Name of the line of service
    #[serde(rename = "Name", default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Protocols through which storage is reachable
    #[serde(rename = "AccessProtocols", default, deserialize_with = "null_as_default")]
    pub access_protocols: Vec<Protocol>,
    /// Maximum throughput, in bytes per second
    #[serde(rename = "MaxBytesPerSecond", default, skip_serializing_if = "Option::is_none")]
    pub max_bytes_per_second: Option<u64>,
    /// Maximum IO operations per second
    #[serde(rename = "MaxIOPS", default, skip_serializing_if = "Option::is_none")]
    pub max_iops: Option<u64>,
}

/// IO connectivity capabilities of a storage service.
///
/// The supported limits, protocols and lines of service are writable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IOConnectivityLoSCapabilities {
    /// Resource identity
    #[serde(flatten)]
    pub entity: Entity,
    /// OData context
    #[serde(rename = "@odata.context", default, skip_serializing_if = "String::is_empty")]
    pub odata_context: String,
    /// OData type
    #[serde(rename = "@odata.type", default)]
    pub odata_type: String,
    /// Description of this resource
    #[serde(rename = "Description", default)]
    pub description: String,
    /// Durable identifier of the capabilities
    #[serde(rename = "Identifier", default, deserialize_with = "null_as_default")]
    pub identifier: Identifier,
    /// Maximum supported throughput, in bytes per second
    #[serde(rename = "MaxSupportedBytesPerSecond", default, deserialize_with = "null_as_default")]
    pub max_supported_bytes_per_second: u64,
    /// Maximum supported IO operations per second
    #[serde(rename = "MaxSupportedIOPS", default, deserialize_with = "null_as_default")]
    pub max_supported_iops: u64,
    /// OEM extensions
    #[serde(rename = "Oem", default, skip_serializing_if = "serde_json::Value::is_null")]
    pub oem: serde_json::Value,
    /// Supported access protocols
    #[serde(rename = "SupportedAccessProtocols", default, deserialize_with = "null_as_default")]
    pub supported_access_protocols: Vec<Protocol>,
    /// Lines of service that may be offered
    #[serde(rename = "SupportedLinesOfService", default, deserialize_with = "null_as_default")]
    pub supported_lines_of_service: Vec<IOConnectivityLineOfService>,
    /// Number of lines of service reported by the service
    #[serde(rename = "SupportedLinesOfService@odata.count", default)]
    pub supported_lines_of_service_count: usize,
    #[serde(skip)]
    snapshot: Snapshot,
}

impl IOConnectivityLoSCapabilities {
    /// Returns true if `protocol` is among the supported access protocols.
    #[must_use]
    pub fn supports(&self, protocol: &Protocol) -> bool {
        self.supported_access_protocols.contains(protocol)
    }
}

impl Resource for IOConnectivityLoSCapabilities {
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

impl Updatable for IOConnectivityLoSCapabilities {
    const MUTABLE_FIELDS: &'static [MutableField<Self>] = redfish_core::mutable_fields!(IOConnectivityLoSCapabilities {
        "MaxSupportedBytesPerSecond" => max_supported_bytes_per_second,
        "MaxSupportedIOPS" => max_supported_iops,
        "SupportedAccessProtocols" => supported_access_protocols,
        "SupportedLinesOfService" => supported_lines_of_service,
    });

    fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}
