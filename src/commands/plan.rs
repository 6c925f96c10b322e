//! `relhook plan`: show which hooks a change feed would run, without
//! running any.

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::feed::open_feed;
use crate::models::hook::HookKind;
use crate::orchestrator::runner::RecordedHook;
use crate::orchestrator::{RecordingRunner, Uniter};

pub fn execute(config: &Config, events: &str) -> Result<()> {
    let mut uniter = Uniter::new(RecordingRunner::new());
    for relation in config.declared_relations()? {
        uniter.declare_relation(relation);
    }

    let feed = open_feed(events)?;
    let summary = uniter.run(feed)?;
    let hooks = uniter.into_runner().into_hooks();

    if hooks.is_empty() {
        println!("(no hooks would run)");
        return Ok(());
    }

    println!("{}", "Hook plan:".bold());
    for (index, hook) in hooks.iter().enumerate() {
        println!("{}", format_hook(index + 1, hook));
    }
    println!();
    summary.print();

    Ok(())
}

fn format_hook(position: usize, hook: &RecordedHook) -> String {
    let name = hook.hook_name();
    let name = match hook.invocation.kind {
        HookKind::Joined => name.green(),
        HookKind::Changed => name.yellow(),
        HookKind::Departed => name.red(),
    };
    format!(
        "{:>4}. {:<8} {:<32} {:<16} members: [{}]",
        position,
        hook.relation.to_string(),
        name,
        hook.invocation.unit,
        hook.invocation.member_names().join(", ")
    )
}
