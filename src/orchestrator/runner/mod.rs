//! Hook execution.
//!
//! The uniter hands each hook to a [`HookRunner`]. [`ScriptRunner`] runs the
//! charm's hook scripts; [`RecordingRunner`] only records what would run.

mod executor;
mod result;

#[cfg(test)]
mod tests;

pub use executor::ScriptRunner;
pub use result::{HookOutcome, HookResult};

use anyhow::Result;

use crate::models::hook::HookInvocation;
use crate::models::relation::RelationId;

/// Executes relation hooks.
pub trait HookRunner {
    fn run(&mut self, relation: &RelationId, invocation: &HookInvocation) -> Result<HookOutcome>;
}

/// A hook request captured by [`RecordingRunner`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedHook {
    pub relation: RelationId,
    pub invocation: HookInvocation,
}

impl RecordedHook {
    pub fn hook_name(&self) -> String {
        self.invocation.kind.hook_name(&self.relation.name)
    }
}

/// Runner that executes nothing and remembers every request.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    hooks: Vec<RecordedHook>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hooks(&self) -> &[RecordedHook] {
        &self.hooks
    }

    pub fn into_hooks(self) -> Vec<RecordedHook> {
        self.hooks
    }
}

impl HookRunner for RecordingRunner {
    fn run(&mut self, relation: &RelationId, invocation: &HookInvocation) -> Result<HookOutcome> {
        let recorded = RecordedHook {
            relation: relation.clone(),
            invocation: invocation.clone(),
        };
        let hook_name = recorded.hook_name();
        self.hooks.push(recorded);
        Ok(HookOutcome::Ran(HookResult::succeeded(hook_name)))
    }
}
