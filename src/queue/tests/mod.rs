//! Tests for the relation hook queue


use crate::models::change::RelationChangeBatch;
use crate::models::hook::{HookInvocation, HookKind};
use crate::queue::HookQueue;

/// Peek, check the hook, and acknowledge it.
fn expect_hook(queue: &mut HookQueue, kind: HookKind, unit: &str, members: &[(&str, i64)]) {
    let invocation = queue
        .peek()
        .unwrap_or_else(|| panic!("expected {kind} for {unit}, queue was empty"));
    assert_hook(&invocation, kind, unit, members);
    queue.ack();
}

fn assert_hook(invocation: &HookInvocation, kind: HookKind, unit: &str, members: &[(&str, i64)]) {
    assert_eq!(invocation.kind, kind, "hook kind for {unit}");
    assert_eq!(invocation.unit, unit);

    let actual: Vec<(&str, i64)> = invocation
        .members
        .iter()
        .map(|(name, settings)| (name.as_str(), settings.version))
        .collect();
    assert_eq!(actual, members, "members for {kind} {unit}");
}

fn expect_nothing(queue: &mut HookQueue) {
    if let Some(invocation) = queue.peek() {
        panic!("expected no hooks, got {} for {}", invocation.kind, invocation.unit);
    }
}

fn batch() -> RelationChangeBatch {
    RelationChangeBatch::new()
}

/// A queue where each unit has already run `joined` and `changed` at the
/// given version.
fn settled_queue(units: &[(&str, i64)]) -> HookQueue {
    let mut queue = HookQueue::new();
    let mut joined = batch();
    for (unit, version) in units {
        joined = joined.change(unit, *version);
    }
    queue.ingest(joined).unwrap();

    while queue.peek().is_some() {
        queue.ack();
    }
    queue
}
