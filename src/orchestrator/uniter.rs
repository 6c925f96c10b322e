//! The uniter: drives relation hook queues through a hook runner.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::{debug, info};

use super::journal::{append_entry, JournalEntry};
use super::runner::{HookOutcome, HookRunner};
use crate::feed::RelationEvent;
use crate::models::hook::HookKind;
use crate::models::relation::RelationId;
use crate::queue::HookQueue;

/// Counts of what a uniter has done so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Feed events applied
    pub events: usize,
    /// Hooks whose script ran (successfully)
    pub hooks_run: usize,
    /// Hooks with no script in the charm
    pub hooks_missing: usize,
    pub by_kind: BTreeMap<HookKind, usize>,
}

impl RunSummary {
    fn record(&mut self, kind: HookKind, outcome: &HookOutcome) {
        match outcome {
            HookOutcome::Ran(_) => self.hooks_run += 1,
            HookOutcome::Missing { .. } => self.hooks_missing += 1,
        }
        *self.by_kind.entry(kind).or_insert(0) += 1;
    }

    /// Hooks dispatched, whether or not a script existed.
    pub fn total_hooks(&self) -> usize {
        self.hooks_run + self.hooks_missing
    }

    pub fn count(&self, kind: HookKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    pub fn print(&self) {
        println!(
            "{} {} events, {} hooks ({} ran, {} missing)",
            "Done:".green().bold(),
            self.events,
            self.total_hooks(),
            self.hooks_run,
            self.hooks_missing
        );
        for kind in HookKind::all() {
            println!("  {:<10} {}", kind.to_string(), self.count(*kind));
        }
    }
}

/// Owns one [`HookQueue`] per relation and runs their hooks one at a time.
///
/// A failed hook is left in flight: the next [`drain`](Self::drain) hands
/// the same hook to the runner again.
pub struct Uniter<R: HookRunner> {
    runner: R,
    queues: BTreeMap<RelationId, HookQueue>,
    declared: BTreeSet<RelationId>,
    journal: Option<PathBuf>,
    summary: RunSummary,
}

impl<R: HookRunner> Uniter<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            queues: BTreeMap::new(),
            declared: BTreeSet::new(),
            journal: None,
            summary: RunSummary::default(),
        }
    }

    /// Append every executed hook to the journal at `path`.
    pub fn with_journal(mut self, path: PathBuf) -> Self {
        self.journal = Some(path);
        self
    }

    /// Accept events for `relation`. Once any relation is declared, events
    /// for undeclared relations are rejected.
    pub fn declare_relation(&mut self, relation: RelationId) {
        self.queues.entry(relation.clone()).or_default();
        self.declared.insert(relation);
    }

    /// Ingest one feed event into its relation's queue.
    pub fn apply(&mut self, event: RelationEvent) -> Result<()> {
        let RelationEvent { relation, batch } = event;

        if !self.declared.is_empty() && !self.declared.contains(&relation) {
            bail!("Relation {relation} is not declared in the configuration");
        }

        debug!(
            relation = %relation,
            changed = batch.changed.len(),
            departed = batch.departed.len(),
            "Applying relation event"
        );

        self.queues
            .entry(relation.clone())
            .or_default()
            .ingest(batch)
            .with_context(|| format!("Failed to apply event for relation {relation}"))?;
        self.summary.events += 1;
        Ok(())
    }

    /// Run hooks until every queue is empty, visiting relations in id order.
    ///
    /// Stops at the first failed hook without acknowledging it.
    pub fn drain(&mut self) -> Result<()> {
        for (relation, queue) in self.queues.iter_mut() {
            while let Some(invocation) = queue
                .try_peek()
                .with_context(|| format!("Hook queue for {relation} is inconsistent"))?
            {
                let outcome = self.runner.run(relation, &invocation).with_context(|| {
                    format!(
                        "Failed to run {}",
                        invocation.kind.hook_name(&relation.name)
                    )
                })?;

                if let Some(path) = &self.journal {
                    let entry = JournalEntry::from_outcome(relation, &invocation.unit, &outcome);
                    append_entry(path, &entry)?;
                }

                if let HookOutcome::Ran(result) = &outcome {
                    if !result.success {
                        bail!(
                            "Hook {} failed for remote unit {}: {}",
                            result.hook_name,
                            invocation.unit,
                            result.summary()
                        );
                    }
                }

                info!(
                    relation = %relation,
                    hook = outcome.hook_name(),
                    remote_unit = %invocation.unit,
                    "Hook completed"
                );
                self.summary.record(invocation.kind, &outcome);
                queue
                    .try_ack()
                    .with_context(|| format!("Failed to acknowledge hook on {relation}"))?;
            }
        }

        Ok(())
    }

    /// Apply and drain every event of `feed` in order.
    pub fn run<I>(&mut self, feed: I) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<RelationEvent>>,
    {
        for event in feed {
            self.apply(event?)?;
            self.drain()?;
        }

        Ok(self.summary.clone())
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn queue(&self, relation: &RelationId) -> Option<&HookQueue> {
        self.queues.get(relation)
    }

    pub fn relations(&self) -> impl Iterator<Item = &RelationId> {
        self.queues.keys()
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn into_runner(self) -> R {
        self.runner
    }
}
