//! Pending hook order.
//!
//! Entries normally wait in a FIFO. The one exception is the `changed` hook
//! that follows a unit's `joined` hook: it sits in a single front slot and is
//! handed out before anything in the FIFO.

use std::collections::VecDeque;

use crate::models::hook::HookKind;

/// A pending hook for one remote unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub unit: String,
    pub kind: HookKind,
}

impl QueueEntry {
    pub fn new(unit: &str, kind: HookKind) -> Self {
        Self {
            unit: unit.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Default)]
pub struct OrderingQueue {
    front: Option<QueueEntry>,
    back: VecDeque<QueueEntry>,
}

impl OrderingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, entry: QueueEntry) {
        self.back.push_back(entry);
    }

    /// Place `entry` ahead of all other pending entries.
    ///
    /// The front slot holds one entry; a previous occupant is pushed to the
    /// head of the FIFO so it still runs next.
    pub fn promote(&mut self, entry: QueueEntry) {
        if let Some(previous) = self.front.replace(entry) {
            self.back.push_front(previous);
        }
    }

    /// Remove the pending entry for `unit`, wherever it sits.
    pub fn cancel(&mut self, unit: &str) -> Option<QueueEntry> {
        if self.front.as_ref().is_some_and(|entry| entry.unit == unit) {
            return self.front.take();
        }

        let position = self.back.iter().position(|entry| entry.unit == unit)?;
        self.back.remove(position)
    }

    pub fn pop(&mut self) -> Option<QueueEntry> {
        self.front.take().or_else(|| self.back.pop_front())
    }

    pub fn len(&self) -> usize {
        self.back.len() + usize::from(self.front.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_none() && self.back.is_empty()
    }

    /// Pending entries in the order they will be handed out.
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.front.iter().chain(self.back.iter())
    }
}
