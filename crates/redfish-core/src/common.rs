//! Schema types shared by many resource kinds.

use serde::{Deserialize, Serialize};

/// Known state of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    /// Enabled and operating
    Enabled,
    /// Disabled
    Disabled,
    /// Enabled but waiting on an external action
    StandbyOffline,
    /// Part of a redundancy set, awaiting failover
    StandbySpare,
    /// Under test
    InTest,
    /// Starting
    Starting,
    /// Absent or not detected
    Absent,
    /// Enabled but only processes a restricted set of commands
    UnavailableOffline,
    /// Deferring
    Deferring,
    /// Quiesced
    Quiesced,
    /// Updating
    Updating,
    /// Qualified
    Qualified,
    /// Any state this client does not know about
    #[serde(other)]
    Unknown,
}

/// Health of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Health {
    /// Normal
    #[serde(rename = "OK")]
    Ok,
    /// A condition requires attention
    Warning,
    /// A critical condition requires immediate attention
    Critical,
    /// Any health value this client does not know about
    #[serde(other)]
    Unknown,
}

/// Status and health properties of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Known state of the resource
    #[serde(rename = "State", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<State>,

    /// Health of the resource itself
    #[serde(rename = "Health", default, skip_serializing_if = "Option::is_none")]
    pub health: Option<Health>,

    /// Health of the resource and its dependents
    #[serde(rename = "HealthRollup", default, skip_serializing_if = "Option::is_none")]
    pub health_rollup: Option<Health>,
}

impl Status {
    /// Returns true if the resource reports itself enabled and healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.state == Some(State::Enabled) && self.health == Some(Health::Ok)
    }
}

/// A durable, globally unique name for a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    /// The identifier value
    #[serde(rename = "DurableName", default)]
    pub durable_name: String,

    /// Format of `durable_name` (e.g. `NAA`, `UUID`, `iQN`)
    #[serde(rename = "DurableNameFormat", default)]
    pub durable_name_format: String,
}
