//! Relation membership change batches delivered by a watcher.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::settings::{Settings, UnitSettings, Version};

/// One atomic set of membership and settings changes for a relation.
///
/// Changed units are applied first, in lexical order of unit name, then
/// departed units, also in lexical order. A unit present in both sets
/// therefore ends up departed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationChangeBatch {
    #[serde(default)]
    pub changed: BTreeMap<String, UnitSettings>,
    #[serde(default)]
    pub departed: BTreeSet<String>,
}

impl RelationChangeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn change(mut self, unit: &str, version: Version) -> Self {
        self.changed
            .insert(unit.to_string(), UnitSettings::new(version));
        self
    }

    pub fn change_with(mut self, unit: &str, version: Version, settings: Settings) -> Self {
        self.changed.insert(
            unit.to_string(),
            UnitSettings::with_settings(version, settings),
        );
        self
    }

    pub fn depart(mut self, unit: &str) -> Self {
        self.departed.insert(unit.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.departed.is_empty()
    }

    /// Units named in both the changed and departed sets.
    pub fn conflicting_units(&self) -> Vec<&str> {
        self.departed
            .iter()
            .filter(|unit| self.changed.contains_key(*unit))
            .map(String::as_str)
            .collect()
    }
}
