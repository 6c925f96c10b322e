use thiserror::Error;

use super::types::Lifecycle;

/// A lifecycle move the state machine does not permit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid unit lifecycle transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: Lifecycle,
    pub to: Lifecycle,
}

impl Lifecycle {
    /// Check if transitioning from the current state to `new_state` is valid.
    ///
    /// Staying in the same state is always valid. `Gone` is terminal; a unit
    /// that comes back after departing gets a new record starting at
    /// `Unseen`.
    pub fn can_transition_to(&self, new_state: &Lifecycle) -> bool {
        if self == new_state {
            return true;
        }

        match self {
            Lifecycle::Unseen => matches!(new_state, Lifecycle::JoinPending),
            Lifecycle::JoinPending => {
                matches!(new_state, Lifecycle::JoinAnnounced | Lifecycle::Unseen)
            }
            Lifecycle::JoinAnnounced => matches!(
                new_state,
                Lifecycle::ChangePending | Lifecycle::DeparturePending
            ),
            Lifecycle::Settled => matches!(
                new_state,
                Lifecycle::ChangePending | Lifecycle::DeparturePending
            ),
            Lifecycle::ChangePending => matches!(
                new_state,
                Lifecycle::ChangeAnnounced | Lifecycle::Settled | Lifecycle::DeparturePending
            ),
            Lifecycle::ChangeAnnounced => {
                matches!(new_state, Lifecycle::Settled | Lifecycle::DeparturePending)
            }
            Lifecycle::DeparturePending => matches!(
                new_state,
                Lifecycle::DepartureAnnounced | Lifecycle::Settled | Lifecycle::ChangePending
            ),
            Lifecycle::DepartureAnnounced => matches!(new_state, Lifecycle::Gone),
            Lifecycle::Gone => false, // Terminal state
        }
    }

    /// Attempt to transition to a new state, returning an error if invalid.
    pub fn try_transition(&self, new_state: Lifecycle) -> Result<Lifecycle, InvalidTransition> {
        if self.can_transition_to(&new_state) {
            Ok(new_state)
        } else {
            Err(InvalidTransition {
                from: *self,
                to: new_state,
            })
        }
    }

    /// Returns the list of states this state can transition to.
    pub fn valid_transitions(&self) -> Vec<Lifecycle> {
        match self {
            Lifecycle::Unseen => vec![Lifecycle::JoinPending],
            Lifecycle::JoinPending => vec![Lifecycle::JoinAnnounced, Lifecycle::Unseen],
            Lifecycle::JoinAnnounced => {
                vec![Lifecycle::ChangePending, Lifecycle::DeparturePending]
            }
            Lifecycle::Settled => vec![Lifecycle::ChangePending, Lifecycle::DeparturePending],
            Lifecycle::ChangePending => vec![
                Lifecycle::ChangeAnnounced,
                Lifecycle::Settled,
                Lifecycle::DeparturePending,
            ],
            Lifecycle::ChangeAnnounced => vec![Lifecycle::Settled, Lifecycle::DeparturePending],
            Lifecycle::DeparturePending => vec![
                Lifecycle::DepartureAnnounced,
                Lifecycle::Settled,
                Lifecycle::ChangePending,
            ],
            Lifecycle::DepartureAnnounced => vec![Lifecycle::Gone],
            Lifecycle::Gone => vec![], // Terminal state
        }
    }

    pub fn all() -> &'static [Lifecycle] {
        &[
            Lifecycle::Unseen,
            Lifecycle::JoinPending,
            Lifecycle::JoinAnnounced,
            Lifecycle::Settled,
            Lifecycle::ChangePending,
            Lifecycle::ChangeAnnounced,
            Lifecycle::DeparturePending,
            Lifecycle::DepartureAnnounced,
            Lifecycle::Gone,
        ]
    }
}
