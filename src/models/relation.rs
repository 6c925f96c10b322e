//! Relation identifiers.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies one relation from the local unit's side, written `<name>:<id>`
/// (for example `db:0`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelationId {
    pub name: String,
    pub id: u32,
}

impl RelationId {
    pub fn new(name: &str, id: u32) -> Self {
        Self {
            name: name.to_string(),
            id,
        }
    }
}

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.id)
    }
}

impl FromStr for RelationId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((name, id)) = s.split_once(':') else {
            bail!("Invalid relation id '{s}': expected <name>:<number>");
        };

        if name.is_empty() {
            bail!("Invalid relation id '{s}': relation name is empty");
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            bail!("Invalid relation id '{s}': name may only contain alphanumerics, '-' and '_'");
        }

        let id = id
            .parse::<u32>()
            .with_context(|| format!("Invalid relation id '{s}': '{id}' is not a number"))?;

        Ok(Self::new(name, id))
    }
}

impl TryFrom<String> for RelationId {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RelationId> for String {
    fn from(value: RelationId) -> Self {
        value.to_string()
    }
}
