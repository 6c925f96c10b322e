//! `relhook journal`: show executed hooks.

use anyhow::{bail, Result};
use colored::{ColoredString, Colorize};

use crate::config::Config;
use crate::orchestrator::{read_journal, JournalEntry, JournalOutcome};

pub fn execute(config: &Config, last: Option<usize>) -> Result<()> {
    let Some(path) = &config.journal else {
        bail!("No journal configured; set 'journal' in the configuration");
    };

    let entries = read_journal(path, last)?;
    if entries.is_empty() {
        println!("(journal is empty)");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", format_entry(entry));
    }

    Ok(())
}

fn outcome_label(outcome: JournalOutcome) -> ColoredString {
    let label = outcome.to_string();
    match outcome {
        JournalOutcome::Ok => label.green(),
        JournalOutcome::Missing => label.dimmed(),
        JournalOutcome::Failed | JournalOutcome::TimedOut => label.red().bold(),
    }
}

fn format_entry(entry: &JournalEntry) -> String {
    format!(
        "{}  {:<9} {:<32} {:<16} {}ms",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        outcome_label(entry.outcome),
        entry.hook,
        entry.remote_unit,
        entry.duration_ms
    )
}
