//! `relhook run`: execute relation hooks for a change feed.

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::feed::open_feed;
use crate::orchestrator::{ScriptRunner, Uniter};

pub fn execute(config: &Config, events: &str) -> Result<()> {
    let runner = ScriptRunner::new(config.charm_dir.clone(), config.unit.clone())
        .with_timeout(config.hook_timeout());

    let mut uniter = Uniter::new(runner);
    if let Some(journal) = &config.journal {
        uniter = uniter.with_journal(journal.clone());
    }
    for relation in config.declared_relations()? {
        uniter.declare_relation(relation);
    }

    println!(
        "{} relation hooks for {} from {}",
        "Running".bold(),
        config.unit.cyan(),
        config.charm_dir.display()
    );

    let feed = open_feed(events)?;
    let summary = uniter.run(feed)?;
    summary.print();

    Ok(())
}
