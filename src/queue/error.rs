use thiserror::Error;

use super::reducer::UnitEvent;
use crate::models::unit::{InvalidTransition, Lifecycle};

/// Errors raised by the hook queue. All of them indicate a caller bug or a
/// broken internal invariant; none are retryable.
#[derive(Debug, Error)]
pub enum HookQueueError {
    #[error("can't acknowledge when nothing is in flight")]
    NothingInFlight,

    #[error("unit '{unit}' cannot handle {event} while {lifecycle}")]
    UnexpectedEvent {
        unit: String,
        lifecycle: Lifecycle,
        event: &'static str,
    },

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
}

impl HookQueueError {
    pub(super) fn unexpected(unit: &str, lifecycle: Lifecycle, event: &UnitEvent) -> Self {
        HookQueueError::UnexpectedEvent {
            unit: unit.to_string(),
            lifecycle,
            event: event.name(),
        }
    }
}
