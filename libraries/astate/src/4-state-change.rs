//! # State change
//! The body of `PUT /api/abstracts/{id}/state`. Requests are checked against the transition table before they
//! are sent, so an invalid request never reaches the server.

use crate::{AbstractState, Openness, Role, StateError, can_transition};

/// Notes are stored in a 255 character column on the server.
pub const MAX_NOTE_LEN: usize = 255;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
pub struct StateChange {
    pub state: AbstractState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl StateChange {
    /// An empty note is dropped rather than sent.
    pub fn new(state: AbstractState, note: Option<String>) -> Result<Self, StateError> {
        let note = note.filter(|note| !note.is_empty());
        if let Some(note) = &note {
            let len = note.chars().count();
            if len > MAX_NOTE_LEN {
                return Err(StateError::NoteTooLong { len });
            }
        }
        Ok(Self { state, note })
    }

    pub fn validate(&self, role: Role, openness: Openness, from: AbstractState) -> Result<(), StateError> {
        if can_transition(role, openness, from, self.state) {
            Ok(())
        } else {
            Err(StateError::InvalidTransition {
                from,
                to: self.state,
            })
        }
    }
}

/// Characters still available for a note of the given content.
pub fn note_characters_left(note: &str) -> usize {
    MAX_NOTE_LEN.saturating_sub(note.chars().count())
}
