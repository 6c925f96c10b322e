use serde::{Deserialize, Serialize};
use std::fmt;

use super::transitions::InvalidTransition;
use crate::models::settings::{UnitSettings, Version};

/// Lifecycle of a remote unit as seen by one relation's hook queue.
///
/// State machine transitions:
/// - `Unseen` -> `JoinPending` (first appearance)
/// - `JoinPending` -> `JoinAnnounced` (joined hook handed out) | `Unseen` (departed first)
/// - `JoinAnnounced` -> `ChangePending` (joined acknowledged) | `DeparturePending`
/// - `ChangePending` -> `ChangeAnnounced` | `Settled` (nothing left to report) | `DeparturePending`
/// - `ChangeAnnounced` -> `Settled` | `DeparturePending`
/// - `Settled` -> `ChangePending` | `DeparturePending`
/// - `DeparturePending` -> `DepartureAnnounced` | `Settled` | `ChangePending` (reappeared)
/// - `DepartureAnnounced` -> `Gone`
/// - `Gone` is a terminal state; a reappearing unit starts over from `Unseen`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lifecycle {
    /// Never seen, or elided before any hook ran.
    #[default]
    Unseen,
    /// A `joined` hook is queued.
    JoinPending,
    /// The `joined` hook is in flight.
    JoinAnnounced,
    /// Current member with nothing queued.
    Settled,
    /// A `changed` hook is queued.
    ChangePending,
    /// The `changed` hook is in flight.
    ChangeAnnounced,
    /// A `departed` hook is queued.
    DeparturePending,
    /// The `departed` hook is in flight.
    DepartureAnnounced,
    /// Departed hook acknowledged; terminal.
    Gone,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Unseen => write!(f, "Unseen"),
            Lifecycle::JoinPending => write!(f, "JoinPending"),
            Lifecycle::JoinAnnounced => write!(f, "JoinAnnounced"),
            Lifecycle::Settled => write!(f, "Settled"),
            Lifecycle::ChangePending => write!(f, "ChangePending"),
            Lifecycle::ChangeAnnounced => write!(f, "ChangeAnnounced"),
            Lifecycle::DeparturePending => write!(f, "DeparturePending"),
            Lifecycle::DepartureAnnounced => write!(f, "DepartureAnnounced"),
            Lifecycle::Gone => write!(f, "Gone"),
        }
    }
}

impl Lifecycle {
    /// Whether a unit in this state appears in other units' member snapshots.
    pub fn is_member(&self) -> bool {
        matches!(
            self,
            Lifecycle::JoinAnnounced
                | Lifecycle::Settled
                | Lifecycle::ChangePending
                | Lifecycle::ChangeAnnounced
        )
    }

    /// Whether the unit owns an entry in the ordering queue.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            Lifecycle::JoinPending | Lifecycle::ChangePending | Lifecycle::DeparturePending
        )
    }

    /// Whether the unit's hook is currently in flight.
    pub fn is_announced(&self) -> bool {
        matches!(
            self,
            Lifecycle::JoinAnnounced | Lifecycle::ChangeAnnounced | Lifecycle::DepartureAnnounced
        )
    }

    /// Whether the tracker should forget this record.
    pub fn is_vacant(&self) -> bool {
        matches!(self, Lifecycle::Unseen | Lifecycle::Gone)
    }
}

/// Everything the hook queue knows about one remote unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub lifecycle: Lifecycle,
    /// Settings version carried by the last announced `joined` or `changed`
    /// hook. `None` until the unit's `joined` hook completes.
    pub applied_version: Option<Version>,
    /// Most recently received settings; may be ahead of `applied_version`.
    pub latest: UnitSettings,
    /// The unit departed while one of its hooks was in flight.
    #[serde(default)]
    pub depart_after_completion: bool,
    /// The unit reappeared while its `departed` hook was in flight.
    #[serde(default)]
    pub rejoin_after_departure: bool,
    /// The `changed` hook owed after `joined` has not run yet.
    #[serde(default)]
    pub follow_up_owed: bool,
}

impl UnitRecord {
    /// A fresh record for a unit seen for the first time.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest_version(&self) -> Version {
        self.latest.version
    }

    /// Whether `version` differs from what hooks have already reported.
    pub fn is_newer_than_applied(&self, version: Version) -> bool {
        self.applied_version != Some(version)
    }

    /// Move to a new lifecycle state, refusing transitions the state machine
    /// does not allow. The record is unchanged on error.
    pub fn try_transition(&mut self, to: Lifecycle) -> Result<(), InvalidTransition> {
        self.lifecycle = self.lifecycle.try_transition(to)?;
        Ok(())
    }
}
