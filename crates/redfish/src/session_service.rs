//! Session service properties of a Redfish implementation.

use crate::session::Session;
use crate::Result;
use redfish_core::common::Status;
use redfish_core::{resolve_collection, Entity, Link, MutableField, Resource, Snapshot, Updatable};
use serde::{Deserialize, Serialize};

/// Session service of a Redfish implementation.
///
/// `ServiceEnabled` and `SessionTimeout` are writable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionService {
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
    /// OEM extensions
    #[serde(rename = "Oem", default, skip_serializing_if = "serde_json::Value::is_null")]
    pub oem: serde_json::Value,
    /// Whether new sessions may be created
    #[serde(rename = "ServiceEnabled", default)]
    pub service_enabled: bool,
    /// Inactivity threshold, in seconds, after which a session is closed
    #[serde(rename = "SessionTimeout", default)]
    pub session_timeout: u32,
    /// Status and health
    #[serde(rename = "Status", default)]
    pub status: Status,
    /// Link to the sessions collection
    #[serde(rename = "Sessions", default)]
    pub sessions: Link,
    #[serde(skip)]
    snapshot: Snapshot,
}

impl SessionService {
    /// Resolve the open sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the service was not fetched, or any session fails to resolve.
    pub async fn sessions(&self) -> Result<Vec<Session>> {
        resolve_collection(self.entity.client()?, &self.sessions).await
    }
}

impl Resource for SessionService {
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

impl Updatable for SessionService {
    const MUTABLE_FIELDS: &'static [MutableField<Self>] = redfish_core::mutable_fields!(SessionService {
        "ServiceEnabled" => service_enabled,
        "SessionTimeout" => session_timeout,
    });

    fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_session_service() {
        let service: SessionService = serde_json::from_value(json!({
            "@odata.context": "/redfish/v1/$metadata#SessionService.SessionService",
            "@odata.id": "/redfish/v1/SessionService",
            "@odata.type": "#SessionService.v1_1_8.SessionService",
            "Description": "Session Service",
            "Id": "SessionService",
            "Name": "Session Service",
            "ServiceEnabled": true,
            "SessionTimeout": 1800,
            "Sessions": {"@odata.id": "/redfish/v1/SessionService/Sessions"},
            "Status": {"State": "Enabled", "Health": "OK"}
        }))
        .unwrap();

        assert_eq!(service.entity.id, "SessionService");
        assert!(service.service_enabled);
        assert_eq!(service.session_timeout, 1800);
        assert_eq!(service.sessions.as_str(), "/redfish/v1/SessionService/Sessions");
        assert!(service.status.is_healthy());
    }

    #[test]
    fn mutable_fields_are_declared() {
        let names: Vec<&str> = SessionService::MUTABLE_FIELDS
            .iter()
            .map(MutableField::name)
            .collect();
        assert_eq!(names, vec!["ServiceEnabled", "SessionTimeout"]);
    }

    #[tokio::test]
    async fn sessions_require_a_fetched_service() {
        let service = SessionService::default();
        let err = service.sessions().await.unwrap_err();
        assert!(matches!(err, redfish_core::Error::Unbound(_)));
    }
}
