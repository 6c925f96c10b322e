//! Hook context handed to running hooks.
//!
//! Before a hook runs, its context (relation, remote unit, hook kind and the
//! member snapshot) is written to a JSON file and the path is exported as
//! `RELHOOK_CONTEXT`. The `relation-list` and `relation-get` commands read
//! it back from inside the hook.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::hook::{HookInvocation, HookKind};
use crate::models::relation::RelationId;
use crate::models::settings::Members;

/// Environment variable holding the path of the hook context file.
pub const CONTEXT_ENV: &str = "RELHOOK_CONTEXT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookContext {
    pub relation: RelationId,
    pub remote_unit: String,
    pub kind: HookKind,
    pub members: Members,
}

impl HookContext {
    pub fn new(relation: &RelationId, invocation: &HookInvocation) -> Self {
        Self {
            relation: relation.clone(),
            remote_unit: invocation.unit.clone(),
            kind: invocation.kind,
            members: invocation.members.clone(),
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize hook context")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write hook context: {}", path.display()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read hook context: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse hook context: {}", path.display()))
    }

    /// Load the context of the hook this process is running under.
    pub fn from_env() -> Result<Self> {
        let Some(path) = env::var_os(CONTEXT_ENV) else {
            bail!("{CONTEXT_ENV} is not set; relation tools only work inside a relation hook");
        };
        Self::load(&PathBuf::from(path))
    }

    /// Member unit names, sorted.
    pub fn relation_list(&self) -> Vec<&str> {
        self.members.keys().map(String::as_str).collect()
    }

    /// Settings of `unit` (the remote unit if `None`): the whole map, or a
    /// single key. A missing key yields `null`.
    pub fn relation_get(&self, unit: Option<&str>, key: Option<&str>) -> Result<serde_json::Value> {
        let unit = unit.unwrap_or(&self.remote_unit);

        let Some(settings) = self.members.get(unit) else {
            if unit == self.remote_unit && self.kind == HookKind::Departed {
                bail!("Unit '{unit}' has departed relation {}", self.relation);
            }
            bail!("Unit '{unit}' is not a member of relation {}", self.relation);
        };

        match key {
            Some(key) => Ok(settings
                .get(key)
                .cloned()
                .unwrap_or(serde_json::Value::Null)),
            None => serde_json::to_value(&settings.settings)
                .context("Failed to serialize unit settings"),
        }
    }
}
