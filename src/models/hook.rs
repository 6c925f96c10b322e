//! Relation hook kinds and the invocations handed to a hook executor.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::settings::Members;

/// Relation lifecycle hook kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookKind {
    /// A remote unit has entered the relation
    Joined,
    /// A remote unit's settings have changed (always follows `Joined`)
    Changed,
    /// A remote unit has left the relation
    Departed,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::Joined => write!(f, "joined"),
            HookKind::Changed => write!(f, "changed"),
            HookKind::Departed => write!(f, "departed"),
        }
    }
}

impl HookKind {
    /// Name of the hook script for this kind on the given relation,
    /// e.g. `db-relation-joined`.
    pub fn hook_name(&self, relation: &str) -> String {
        format!("{relation}-relation-{self}")
    }

    pub fn all() -> &'static [HookKind] {
        &[HookKind::Joined, HookKind::Changed, HookKind::Departed]
    }
}

/// A hook ready to run: what fired, for which remote unit, and the relation
/// members as they stand at the moment it was requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookInvocation {
    pub kind: HookKind,
    pub unit: String,
    pub members: Members,
}

impl HookInvocation {
    /// Sorted member unit names, as `relation-list` reports them.
    pub fn member_names(&self) -> Vec<&str> {
        self.members.keys().map(String::as_str).collect()
    }
}
