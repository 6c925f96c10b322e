//! Relation hook queue.
//!
//! Turns a stream of relation membership batches into an ordered sequence of
//! `joined` / `changed` / `departed` hooks, one in flight at a time:
//!
//! - [`HookQueue::ingest`] folds a [`RelationChangeBatch`] into the unit
//!   records, queueing, updating, cancelling or replacing hooks
//! - [`HookQueue::peek`] hands out the next hook (repeatable until acked,
//!   with members recomputed on every call)
//! - [`HookQueue::ack`] records completion of the in-flight hook
//!
//! The queue is a plain synchronous data structure. Callers must serialize
//! ingest and peek/ack themselves.

mod error;
mod ordering;
mod reducer;
mod tracker;

#[cfg(test)]
mod tests;

pub use error::HookQueueError;
pub use ordering::{OrderingQueue, QueueEntry};
pub use reducer::{reduce, QueueEffect, UnitEvent};
pub use tracker::UnitTracker;

use tracing::{debug, warn};

use crate::models::change::RelationChangeBatch;
use crate::models::hook::{HookInvocation, HookKind};
use crate::models::unit::{Lifecycle, UnitRecord};

/// Hook scheduler for one relation.
#[derive(Debug, Default)]
pub struct HookQueue {
    tracker: UnitTracker,
    queue: OrderingQueue,
    in_flight: Option<QueueEntry>,
}

impl HookQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one batch of membership changes: changed units first, in
    /// lexical order, then departed units.
    pub fn ingest(&mut self, batch: RelationChangeBatch) -> Result<(), HookQueueError> {
        for unit in batch.conflicting_units() {
            warn!(unit, "Unit both changed and departed in one batch; departure wins");
        }

        let RelationChangeBatch { changed, departed } = batch;

        for (unit, settings) in changed {
            self.apply(&unit, UnitEvent::Changed(settings))?;
        }

        for unit in departed {
            self.apply(&unit, UnitEvent::Departed)?;
        }

        Ok(())
    }

    /// Next hook to run, or `None` when nothing is pending.
    ///
    /// Until [`ack`](Self::ack) is called every peek returns the same unit and
    /// kind, with members rebuilt from the latest ingested settings.
    ///
    /// # Panics
    ///
    /// Panics if the queue's internal invariants are broken.
    pub fn peek(&mut self) -> Option<HookInvocation> {
        match self.try_peek() {
            Ok(invocation) => invocation,
            Err(err) => panic!("hook queue invariant violated: {err}"),
        }
    }

    pub fn try_peek(&mut self) -> Result<Option<HookInvocation>, HookQueueError> {
        while self.in_flight.is_none() {
            let Some(entry) = self.queue.pop() else {
                return Ok(None);
            };

            match self.apply(&entry.unit, UnitEvent::Announced)? {
                QueueEffect::Skip => {
                    debug!(unit = %entry.unit, kind = %entry.kind, "Skipping hook with nothing to report");
                }
                _ => self.in_flight = Some(entry),
            }
        }

        Ok(self.in_flight.as_ref().map(|entry| HookInvocation {
            kind: entry.kind,
            unit: entry.unit.clone(),
            members: self.tracker.members(entry),
        }))
    }

    /// Mark the in-flight hook as done.
    ///
    /// # Panics
    ///
    /// Panics if no hook is in flight (nothing was peeked, or the hook was
    /// already acknowledged).
    pub fn ack(&mut self) {
        if let Err(err) = self.try_ack() {
            panic!("{err}");
        }
    }

    /// Mark the in-flight hook as done, returning the acknowledged entry.
    pub fn try_ack(&mut self) -> Result<QueueEntry, HookQueueError> {
        let entry = self
            .in_flight
            .take()
            .ok_or(HookQueueError::NothingInFlight)?;

        if let Err(err) = self.apply(&entry.unit, UnitEvent::Completed) {
            self.in_flight = Some(entry);
            return Err(err);
        }

        Ok(entry)
    }

    /// Run one event through the reducer and carry out its queue effect.
    fn apply(&mut self, unit: &str, event: UnitEvent) -> Result<QueueEffect, HookQueueError> {
        let record = self.tracker.record(unit);
        let event_name = event.name();
        let (next, effect) = reduce(unit, &record, event)?;

        match effect {
            QueueEffect::None | QueueEffect::Skip => {}
            QueueEffect::Append(kind) => self.queue.push_back(QueueEntry::new(unit, kind)),
            QueueEffect::PromoteToFront => self
                .queue
                .promote(QueueEntry::new(unit, HookKind::Changed)),
            QueueEffect::Cancel => {
                self.queue.cancel(unit);
            }
            QueueEffect::CancelAndReplace(kind) => {
                self.queue.cancel(unit);
                self.queue.push_back(QueueEntry::new(unit, kind));
            }
        }

        debug!(
            unit,
            event = event_name,
            from = %record.lifecycle,
            to = %next.lifecycle,
            ?effect,
            "Unit transition"
        );

        self.tracker.store(unit, next);
        Ok(effect)
    }

    /// The hook currently handed out and not yet acknowledged.
    pub fn in_flight(&self) -> Option<&QueueEntry> {
        self.in_flight.as_ref()
    }

    /// Number of queued hooks, not counting the in-flight one.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether there is nothing queued and nothing in flight.
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none() && self.queue.is_empty()
    }

    pub fn lifecycle(&self, unit: &str) -> Lifecycle {
        self.tracker.lifecycle(unit)
    }

    pub fn record(&self, unit: &str) -> Option<&UnitRecord> {
        self.tracker.get(unit)
    }

    /// Queued entries in the order they will be handed out.
    pub fn queued(&self) -> impl Iterator<Item = &QueueEntry> {
        self.queue.iter()
    }

    pub fn units(&self) -> impl Iterator<Item = (&str, &UnitRecord)> {
        self.tracker.iter()
    }
}
