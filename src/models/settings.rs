//! Remote unit settings as published on a relation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Settings version counter published alongside a unit's relation data.
pub type Version = i64;

/// Opaque key/value relation settings.
pub type Settings = BTreeMap<String, serde_json::Value>;

/// Snapshot of relation members visible to a hook, keyed by unit name.
pub type Members = BTreeMap<String, UnitSettings>;

/// A versioned settings payload for one remote unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitSettings {
    pub version: Version,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: Settings,
}

impl UnitSettings {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            settings: Settings::new(),
        }
    }

    pub fn with_settings(version: Version, settings: Settings) -> Self {
        Self { version, settings }
    }

    /// Add a single setting, replacing any previous value for `key`.
    pub fn with(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.settings.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.settings.get(key)
    }
}
