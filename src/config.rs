//! `relhook.toml` configuration.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::relation::RelationId;

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "relhook.toml";

/// Default time a single hook may run before it is killed (5 minutes).
pub const DEFAULT_HOOK_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Name of the local unit, e.g. `wordpress/0`
    pub unit: String,
    /// Directory containing the `hooks/` scripts
    pub charm_dir: PathBuf,
    pub hook_timeout_secs: u64,
    /// Append-only JSONL journal of executed hooks
    pub journal: Option<PathBuf>,
    /// Fallback log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Declared relations; when non-empty, events for other relations are rejected
    pub relations: Vec<RelationDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationDecl {
    pub name: String,
    pub id: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unit: "local/0".to_string(),
            charm_dir: PathBuf::from("."),
            hook_timeout_secs: DEFAULT_HOOK_TIMEOUT_SECS,
            journal: None,
            log_level: "info".to_string(),
            relations: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Load an explicitly requested config file, or the default file if it
    /// exists, or fall back to built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.unit.trim().is_empty() {
            bail!("'unit' must not be empty");
        }

        if self.hook_timeout_secs == 0 {
            bail!("'hook_timeout_secs' must be greater than zero");
        }

        let mut seen = BTreeSet::new();
        for relation in self.declared_relations()? {
            if !seen.insert(relation.clone()) {
                bail!("Relation {relation} is declared more than once");
            }
        }

        Ok(())
    }

    pub fn hook_timeout(&self) -> Duration {
        Duration::from_secs(self.hook_timeout_secs)
    }

    /// Declared relations as ids, validating their names.
    pub fn declared_relations(&self) -> Result<Vec<RelationId>> {
        self.relations
            .iter()
            .map(|decl| format!("{}:{}", decl.name, decl.id).parse())
            .collect()
    }
}
