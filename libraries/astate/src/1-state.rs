//! # State
//! The seven states of an abstract, plus the two inputs that select a partition of the transition table.
//! States are serialized with the exact names the server uses.

use std::{fmt, str::FromStr};

use crate::StateError;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
pub enum AbstractState {
    InPreparation,
    Submitted,
    InReview,
    Accepted,
    Rejected,
    InRevision,
    Withdrawn,
}

impl AbstractState {
    pub const ALL: [AbstractState; 7] = [
        AbstractState::InPreparation,
        AbstractState::Submitted,
        AbstractState::InReview,
        AbstractState::Accepted,
        AbstractState::Rejected,
        AbstractState::InRevision,
        AbstractState::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AbstractState::InPreparation => "InPreparation",
            AbstractState::Submitted => "Submitted",
            AbstractState::InReview => "InReview",
            AbstractState::Accepted => "Accepted",
            AbstractState::Rejected => "Rejected",
            AbstractState::InRevision => "InRevision",
            AbstractState::Withdrawn => "Withdrawn",
        }
    }

    /// Human readable name, e.g. `InPreparation` becomes `In Preparation`.
    pub fn display_name(&self) -> String {
        display_name(self.as_str())
    }
}

/// Splits a leading `In` off a state name. Works on raw strings too, since the UI
/// sometimes shows states it received from the server before parsing them.
pub fn display_name(state: &str) -> String {
    match state.strip_prefix("In") {
        Some(rest) => format!("In {rest}"),
        None => state.to_string(),
    }
}

impl fmt::Display for AbstractState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AbstractState {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AbstractState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| StateError::UnknownState(s.to_string()))
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Owner,
    Admin,
}

/// Whether the conference's submission window is accepting changes.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
#[serde(rename_all = "camelCase")]
pub enum Openness {
    Open,
    Closed,
}

impl Openness {
    /// Conferences carry an `isOpen` flag.
    pub fn from_is_open(is_open: bool) -> Self {
        if is_open {
            Openness::Open
        } else {
            Openness::Closed
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Openness::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(AbstractState::InPreparation.display_name(), "In Preparation");
        assert_eq!(AbstractState::InReview.display_name(), "In Review");
        assert_eq!(AbstractState::InRevision.display_name(), "In Revision");
        assert_eq!(AbstractState::Accepted.display_name(), "Accepted");
        assert_eq!(AbstractState::Withdrawn.display_name(), "Withdrawn");
    }

    #[test]
    fn test_display_name_raw_strings() {
        assert_eq!(display_name("InPreparation"), "In Preparation");
        assert_eq!(display_name("Saving..."), "Saving...");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_parse_wire_names() {
        for state in AbstractState::ALL {
            assert_eq!(state.as_str().parse::<AbstractState>(), Ok(state));
            assert_eq!(state.to_string(), state.as_str());
        }
        assert_eq!(
            "In Review".parse::<AbstractState>(),
            Err(StateError::UnknownState("In Review".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&AbstractState::InRevision).unwrap();
        assert_eq!(json, "\"InRevision\"");
        let state: AbstractState = serde_json::from_str("\"Withdrawn\"").unwrap();
        assert_eq!(state, AbstractState::Withdrawn);
    }

    #[test]
    fn test_openness_from_flag() {
        assert_eq!(Openness::from_is_open(true), Openness::Open);
        assert!(Openness::from_is_open(false).is_closed());
    }
}
