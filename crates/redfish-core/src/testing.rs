//! Resource kinds used by the unit tests of this crate.

use crate::entity::{Entity, Resource};
use crate::update::{MutableField, Snapshot, Updatable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "Theme", default)]
    pub theme: String,
    #[serde(rename = "Retries", default)]
    pub retries: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Account {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "Enabled", default)]
    pub enabled: bool,
    #[serde(rename = "Timeout", default)]
    pub timeout: u32,
    #[serde(rename = "Locked", default)]
    pub locked: bool,
    #[serde(rename = "Settings", default)]
    pub settings: Settings,
    #[serde(skip)]
    pub snapshot: Snapshot,
}

impl Resource for Account {
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

impl Updatable for Account {
    const MUTABLE_FIELDS: &'static [MutableField<Self>] = crate::mutable_fields!(Account {
        "Enabled" => enabled,
        "Timeout" => timeout,
        "Settings" => settings,
    });

    fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}
