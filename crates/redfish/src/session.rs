//! An established client session.

use chrono::{DateTime, Utc};
use redfish_core::{Entity, Resource};
use serde::Deserialize;

/// A client session. Sessions are read-only once established.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Session {
    /// Resource identity
    #[serde(flatten)]
    pub entity: Entity,
    /// Description of this resource
    #[serde(rename = "Description", default)]
    pub description: String,
    /// Account the session was created for
    #[serde(rename = "UserName", default)]
    pub user_name: String,
    /// When the session was created
    #[serde(rename = "CreatedTime", default)]
    pub created_time: Option<DateTime<Utc>>,
    /// IP address of the client that created the session
    #[serde(rename = "ClientOriginIPAddress", default)]
    pub client_origin_ip_address: Option<String>,
    /// Kind of session (e.g. `Redfish`, `WebUI`, `ManagerConsole`)
    #[serde(rename = "SessionType", default)]
    pub session_type: Option<String>,
}

impl Resource for Session {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}
