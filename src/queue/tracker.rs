//! Per-relation table of remote unit records.

use std::collections::BTreeMap;

use crate::models::hook::HookKind;
use crate::models::settings::Members;
use crate::models::unit::{Lifecycle, UnitRecord};

use super::ordering::QueueEntry;

/// Holds the authoritative record for every unit the relation currently
/// knows about. It makes no decisions; the reducer does.
#[derive(Debug, Default)]
pub struct UnitTracker {
    records: BTreeMap<String, UnitRecord>,
}

impl UnitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, unit: &str) -> Option<&UnitRecord> {
        self.records.get(unit)
    }

    /// The unit's record, or a fresh one if the unit is unknown.
    pub fn record(&self, unit: &str) -> UnitRecord {
        self.records.get(unit).cloned().unwrap_or_default()
    }

    pub fn lifecycle(&self, unit: &str) -> Lifecycle {
        self.records
            .get(unit)
            .map(|record| record.lifecycle)
            .unwrap_or_default()
    }

    /// Store `record` for `unit`. Unseen and gone records are dropped so a
    /// later reappearance starts from scratch.
    pub fn store(&mut self, unit: &str, record: UnitRecord) {
        if record.lifecycle.is_vacant() {
            self.records.remove(unit);
        } else {
            self.records.insert(unit.to_string(), record);
        }
    }

    /// Relation members as seen by the hook for `entry`, built from the
    /// current records.
    ///
    /// Members are units that have joined and are not on their way out,
    /// plus the hook's own unit unless the hook is its departure.
    pub fn members(&self, entry: &QueueEntry) -> Members {
        self.records
            .iter()
            .filter(|(unit, record)| {
                if **unit == entry.unit {
                    entry.kind != HookKind::Departed
                } else {
                    record.lifecycle.is_member()
                }
            })
            .map(|(unit, record)| (unit.clone(), record.latest.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UnitRecord)> {
        self.records
            .iter()
            .map(|(unit, record)| (unit.as_str(), record))
    }
}
