//! Hook journal.
//!
//! Every hook the uniter executes is appended to a JSON Lines file so a
//! run can be audited afterwards with `relhook journal`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::runner::HookOutcome;
use crate::models::relation::RelationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JournalOutcome {
    Ok,
    Failed,
    TimedOut,
    /// No script existed for the hook
    Missing,
}

impl fmt::Display for JournalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JournalOutcome::Ok => write!(f, "ok"),
            JournalOutcome::Failed => write!(f, "failed"),
            JournalOutcome::TimedOut => write!(f, "timed-out"),
            JournalOutcome::Missing => write!(f, "missing"),
        }
    }
}

/// One executed hook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub timestamp: DateTime<Utc>,
    pub relation: RelationId,
    pub hook: String,
    pub remote_unit: String,
    pub outcome: JournalOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
}

impl JournalEntry {
    pub fn from_outcome(relation: &RelationId, remote_unit: &str, outcome: &HookOutcome) -> Self {
        let (journal_outcome, exit_code) = match outcome {
            HookOutcome::Missing { .. } => (JournalOutcome::Missing, None),
            HookOutcome::Ran(result) if result.timed_out => (JournalOutcome::TimedOut, None),
            HookOutcome::Ran(result) if result.success => (JournalOutcome::Ok, result.exit_code),
            HookOutcome::Ran(result) => (JournalOutcome::Failed, result.exit_code),
        };

        Self {
            timestamp: Utc::now(),
            relation: relation.clone(),
            hook: outcome.hook_name().to_string(),
            remote_unit: remote_unit.to_string(),
            outcome: journal_outcome,
            exit_code,
            duration_ms: u64::try_from(outcome.duration().as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn to_json_line(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize journal entry")
    }
}

/// Append one entry to the journal at `path`, creating parent directories
/// as needed.
pub fn append_entry(path: &Path, entry: &JournalEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create journal directory: {}", parent.display())
            })?;
        }
    }

    let json_line = entry.to_json_line()?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open journal: {}", path.display()))?;

    writeln!(file, "{json_line}")
        .with_context(|| format!("Failed to write journal: {}", path.display()))?;

    Ok(())
}

/// Read journal entries, the last `limit` of them if given.
///
/// A missing journal reads as empty. Lines that fail to parse are skipped.
pub fn read_journal(path: &Path, limit: Option<usize>) -> Result<Vec<JournalEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read journal: {}", path.display()))?;

    let mut entries: Vec<JournalEntry> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();

    if let Some(n) = limit {
        let len = entries.len();
        if len > n {
            entries = entries.split_off(len - n);
        }
    }

    Ok(entries)
}
