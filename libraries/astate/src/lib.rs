//! This is the authority on how an abstract moves through review.
//!
//! An abstract is always in exactly one [`AbstractState`]. Who may move it where depends on two things:
//! 1. The [`Role`] of the person acting on it. Owners are the submitting authors, admins are the conference reviewers.
//! 2. The [`Openness`] of the conference. Owners can do more while the submission window is open.
//!    Admins review after the deadline, so their options do not depend on the window at all.
//!
//! The transition table is plain static data. Nothing is stored here; callers always pass in the current state,
//! the role and the openness, and get back the ordered list of states the abstract may move to next.
//! The first entry of that list is the "primary" action that a UI would suggest.
//!
//! Besides the table this crate holds the two small things that travel with a state change:
//! the request body sent to the server ([`StateChange`]) and the log entries it answers with ([`StateLogEntry`]).

#[path = "1-state.rs"]
mod state;

#[path = "2-transitions.rs"]
mod transitions;

#[path = "3-state-log.rs"]
mod state_log;

#[path = "4-state-change.rs"]
mod state_change;

pub use state::*;
pub use state_change::*;
pub use state_log::*;
pub use transitions::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("unknown abstract state: {0:?}")]
    UnknownState(String),

    #[error("note is {len} characters long, at most {max} are allowed", max = MAX_NOTE_LEN)]
    NoteTooLong { len: usize },

    #[error("an abstract cannot move from {from} to {to}")]
    InvalidTransition {
        from: AbstractState,
        to: AbstractState,
    },
}
