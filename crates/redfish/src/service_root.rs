//! The Redfish service root, entry point for navigation.

use redfish_core::{Entity, Link, Resource};
use serde::Deserialize;

/// URI of the service root.
pub const SERVICE_ROOT: &str = "/redfish/v1/";

/// The Redfish service root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceRoot {
    /// Resource identity
    #[serde(flatten)]
    pub entity: Entity,
    /// Version of the Redfish specification implemented
    #[serde(rename = "RedfishVersion", default)]
    pub redfish_version: String,
    /// Unique identifier of the service instance
    #[serde(rename = "UUID", default)]
    pub uuid: String,
    /// Product associated with the service
    #[serde(rename = "Product", default)]
    pub product: String,
    /// Manufacturer or vendor of the service
    #[serde(rename = "Vendor", default)]
    pub vendor: String,
    /// Link to the session service
    #[serde(rename = "SessionService", default)]
    pub session_service: Link,
    /// Link to the systems collection
    #[serde(rename = "Systems", default)]
    pub systems: Link,
    /// Link to the chassis collection
    #[serde(rename = "Chassis", default)]
    pub chassis: Link,
    /// Link to the managers collection
    #[serde(rename = "Managers", default)]
    pub managers: Link,
}

impl Resource for ServiceRoot {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}
