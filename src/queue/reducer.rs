//! The unit transition function.
//!
//! Every change to a unit's record goes through [`reduce`], which maps the
//! current record and one event to the next record plus the single queue
//! operation the caller must perform. The function has no access to the
//! queue itself, so the whole decision table is visible here.

use crate::models::hook::HookKind;
use crate::models::settings::UnitSettings;
use crate::models::unit::{Lifecycle, UnitRecord};

use super::error::HookQueueError;

/// Something that happened to one remote unit.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitEvent {
    /// The unit is present with these settings.
    Changed(UnitSettings),
    /// The unit is no longer present.
    Departed,
    /// The unit's queued hook reached the head and is being handed out.
    Announced,
    /// The unit's in-flight hook was acknowledged.
    Completed,
}

impl UnitEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UnitEvent::Changed(_) => "changed",
            UnitEvent::Departed => "departed",
            UnitEvent::Announced => "announced",
            UnitEvent::Completed => "completed",
        }
    }
}

/// The queue operation that accompanies a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueEffect {
    /// Leave the queue alone.
    None,
    /// Append an entry for the unit at the tail.
    Append(HookKind),
    /// Put the unit's follow-up `changed` entry ahead of everything else.
    PromoteToFront,
    /// Drop the unit's queued entry.
    Cancel,
    /// Drop the unit's queued entry and append a new one at the tail.
    CancelAndReplace(HookKind),
    /// The entry being announced has nothing left to report; drop it without
    /// producing a hook.
    Skip,
}

/// Compute the next record and queue effect for `event` on a unit named
/// `unit` whose current record is `record`.
///
/// Presence events (`Changed`, `Departed`) are accepted in every state.
/// `Announced` is only valid for a pending unit and `Completed` only for an
/// announced one; anything else is a caller bug.
pub fn reduce(
    unit: &str,
    record: &UnitRecord,
    event: UnitEvent,
) -> Result<(UnitRecord, QueueEffect), HookQueueError> {
    match event {
        UnitEvent::Changed(settings) => on_changed(record, settings),
        UnitEvent::Departed => on_departed(record),
        UnitEvent::Announced => on_announced(unit, record),
        UnitEvent::Completed => on_completed(unit, record),
    }
}

fn on_changed(
    record: &UnitRecord,
    settings: UnitSettings,
) -> Result<(UnitRecord, QueueEffect), HookQueueError> {
    let mut next = record.clone();
    let version = settings.version;

    let effect = match record.lifecycle {
        Lifecycle::Unseen | Lifecycle::Gone => {
            next = UnitRecord::new();
            next.latest = settings;
            next.try_transition(Lifecycle::JoinPending)?;
            QueueEffect::Append(HookKind::Joined)
        }
        Lifecycle::JoinPending | Lifecycle::ChangePending => {
            next.latest = settings;
            QueueEffect::None
        }
        Lifecycle::JoinAnnounced | Lifecycle::ChangeAnnounced => {
            // Back before the in-flight hook finished; the departure is off
            next.latest = settings;
            next.depart_after_completion = false;
            QueueEffect::None
        }
        Lifecycle::Settled => {
            next.latest = settings;
            if record.is_newer_than_applied(version) {
                next.try_transition(Lifecycle::ChangePending)?;
                QueueEffect::Append(HookKind::Changed)
            } else {
                QueueEffect::None
            }
        }
        Lifecycle::DeparturePending => {
            next.latest = settings;
            if record.is_newer_than_applied(version) || record.follow_up_owed {
                next.try_transition(Lifecycle::ChangePending)?;
                QueueEffect::CancelAndReplace(HookKind::Changed)
            } else {
                next.try_transition(Lifecycle::Settled)?;
                QueueEffect::Cancel
            }
        }
        Lifecycle::DepartureAnnounced => {
            next.latest = settings;
            next.rejoin_after_departure = true;
            QueueEffect::None
        }
    };

    Ok((next, effect))
}

fn on_departed(record: &UnitRecord) -> Result<(UnitRecord, QueueEffect), HookQueueError> {
    let mut next = record.clone();

    let effect = match record.lifecycle {
        Lifecycle::Unseen | Lifecycle::Gone => QueueEffect::None,
        Lifecycle::JoinPending => {
            // No hook ever ran for this unit; forget it entirely
            next.try_transition(Lifecycle::Unseen)?;
            QueueEffect::Cancel
        }
        Lifecycle::ChangePending | Lifecycle::Settled => {
            next.try_transition(Lifecycle::DeparturePending)?;
            if record.lifecycle == Lifecycle::Settled {
                QueueEffect::Append(HookKind::Departed)
            } else {
                QueueEffect::CancelAndReplace(HookKind::Departed)
            }
        }
        Lifecycle::JoinAnnounced | Lifecycle::ChangeAnnounced => {
            next.depart_after_completion = true;
            QueueEffect::None
        }
        Lifecycle::DeparturePending => QueueEffect::None,
        Lifecycle::DepartureAnnounced => {
            next.rejoin_after_departure = false;
            QueueEffect::None
        }
    };

    Ok((next, effect))
}

fn on_announced(
    unit: &str,
    record: &UnitRecord,
) -> Result<(UnitRecord, QueueEffect), HookQueueError> {
    let mut next = record.clone();

    let effect = match record.lifecycle {
        Lifecycle::JoinPending => {
            next.try_transition(Lifecycle::JoinAnnounced)?;
            QueueEffect::None
        }
        Lifecycle::ChangePending => {
            if !record.follow_up_owed && !record.is_newer_than_applied(record.latest_version()) {
                next.try_transition(Lifecycle::Settled)?;
                QueueEffect::Skip
            } else {
                next.follow_up_owed = false;
                next.try_transition(Lifecycle::ChangeAnnounced)?;
                QueueEffect::None
            }
        }
        Lifecycle::DeparturePending => {
            next.try_transition(Lifecycle::DepartureAnnounced)?;
            QueueEffect::None
        }
        lifecycle => {
            return Err(HookQueueError::unexpected(
                unit,
                lifecycle,
                &UnitEvent::Announced,
            ))
        }
    };

    Ok((next, effect))
}

fn on_completed(
    unit: &str,
    record: &UnitRecord,
) -> Result<(UnitRecord, QueueEffect), HookQueueError> {
    let mut next = record.clone();

    let effect = match record.lifecycle {
        Lifecycle::JoinAnnounced | Lifecycle::ChangeAnnounced => {
            next.applied_version = Some(record.latest_version());
            if record.depart_after_completion {
                next.depart_after_completion = false;
                // A return before the departure runs still owes the post-join change
                next.follow_up_owed = record.lifecycle == Lifecycle::JoinAnnounced;
                next.try_transition(Lifecycle::DeparturePending)?;
                QueueEffect::Append(HookKind::Departed)
            } else if record.lifecycle == Lifecycle::JoinAnnounced {
                next.follow_up_owed = true;
                next.try_transition(Lifecycle::ChangePending)?;
                QueueEffect::PromoteToFront
            } else {
                next.try_transition(Lifecycle::Settled)?;
                QueueEffect::None
            }
        }
        Lifecycle::DepartureAnnounced => {
            next.try_transition(Lifecycle::Gone)?;
            if record.rejoin_after_departure {
                // Same name, brand-new unit
                let mut fresh = UnitRecord::new();
                fresh.latest = record.latest.clone();
                fresh.try_transition(Lifecycle::JoinPending)?;
                return Ok((fresh, QueueEffect::Append(HookKind::Joined)));
            }
            QueueEffect::None
        }
        lifecycle => {
            return Err(HookQueueError::unexpected(
                unit,
                lifecycle,
                &UnitEvent::Completed,
            ))
        }
    };

    Ok((next, effect))
}
