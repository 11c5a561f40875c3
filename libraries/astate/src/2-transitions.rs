//! # Transitions
//! The transition table. Owners get one partition per [`Openness`], admins a single one.
//!
//! Owners may only move forward or withdraw while the window is open, and may only resubmit a revision once it
//! is closed. A state that is not a key of the active partition is terminal for that role and context.

use crate::{AbstractState, Openness, Role};

use AbstractState::*;

type Partition = &'static [(AbstractState, &'static [AbstractState])];

const OWNER_OPEN: Partition = &[
    (InPreparation, &[Submitted]),
    (Submitted, &[InPreparation, Withdrawn]),
    (InRevision, &[Submitted]),
];

const OWNER_CLOSED: Partition = &[(InRevision, &[Submitted])];

const ADMIN: Partition = &[
    (Submitted, &[InReview]),
    (InReview, &[Accepted, Rejected, InRevision, Withdrawn]),
    (InRevision, &[InReview]),
    (Accepted, &[InRevision, Withdrawn]),
    (Rejected, &[InRevision, Withdrawn]),
];

/// The partition of the table that applies to `role` acting in a conference with the given `openness`.
pub fn active_transitions(role: Role, openness: Openness) -> Partition {
    match (role, openness) {
        (Role::Admin, _) => ADMIN,
        (Role::Owner, Openness::Open) => OWNER_OPEN,
        (Role::Owner, Openness::Closed) => OWNER_CLOSED,
    }
}

/// Ordered list of states `from` may move to. Empty means terminal, not an error.
pub fn possible_next_states(
    role: Role,
    openness: Openness,
    from: AbstractState,
) -> &'static [AbstractState] {
    active_transitions(role, openness)
        .iter()
        .find(|(state, _)| *state == from)
        .map(|(_, next)| *next)
        .unwrap_or(&[])
}

pub fn can_transition(role: Role, openness: Openness, from: AbstractState, to: AbstractState) -> bool {
    possible_next_states(role, openness, from).contains(&to)
}

/// The single action a UI should suggest, if any.
pub fn primary_action(role: Role, openness: Openness, from: AbstractState) -> Option<AbstractState> {
    possible_next_states(role, openness, from).first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXTS: [(Role, Openness); 4] = [
        (Role::Owner, Openness::Open),
        (Role::Owner, Openness::Closed),
        (Role::Admin, Openness::Open),
        (Role::Admin, Openness::Closed),
    ];

    #[test]
    fn test_admin_review_edges() {
        for openness in [Openness::Open, Openness::Closed] {
            assert!(can_transition(Role::Admin, openness, InReview, Accepted));
            assert!(!can_transition(Role::Admin, openness, InReview, Submitted));
        }
    }

    #[test]
    fn test_owner_withdraw_depends_on_window() {
        assert!(can_transition(Role::Owner, Openness::Open, Submitted, Withdrawn));
        assert!(!can_transition(Role::Owner, Openness::Closed, Submitted, Withdrawn));
    }

    #[test]
    fn test_admin_ignores_openness() {
        for state in AbstractState::ALL {
            assert_eq!(
                possible_next_states(Role::Admin, Openness::Open, state),
                possible_next_states(Role::Admin, Openness::Closed, state),
            );
        }
    }

    #[test]
    fn test_unknown_keys_are_terminal() {
        for (role, openness) in CONTEXTS {
            let partition = active_transitions(role, openness);
            for state in AbstractState::ALL {
                if partition.iter().all(|(from, _)| *from != state) {
                    assert!(possible_next_states(role, openness, state).is_empty());
                    assert_eq!(primary_action(role, openness, state), None);
                }
            }
        }
        assert!(possible_next_states(Role::Owner, Openness::Closed, Submitted).is_empty());
        assert!(possible_next_states(Role::Admin, Openness::Open, Withdrawn).is_empty());
        assert!(possible_next_states(Role::Admin, Openness::Open, InPreparation).is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        assert_eq!(
            possible_next_states(Role::Admin, Openness::Closed, InReview),
            &[Accepted, Rejected, InRevision, Withdrawn]
        );
        assert_eq!(
            possible_next_states(Role::Owner, Openness::Open, Submitted),
            &[InPreparation, Withdrawn]
        );
        assert_eq!(
            primary_action(Role::Owner, Openness::Open, InPreparation),
            Some(Submitted)
        );
        assert_eq!(
            primary_action(Role::Owner, Openness::Closed, InRevision),
            Some(Submitted)
        );
    }

    #[test]
    fn test_full_table() {
        let expected: [(Role, Openness, AbstractState, &[AbstractState]); 9] = [
            (Role::Owner, Openness::Open, InPreparation, &[Submitted]),
            (Role::Owner, Openness::Open, Submitted, &[InPreparation, Withdrawn]),
            (Role::Owner, Openness::Open, InRevision, &[Submitted]),
            (Role::Owner, Openness::Closed, InRevision, &[Submitted]),
            (Role::Admin, Openness::Open, Submitted, &[InReview]),
            (
                Role::Admin,
                Openness::Open,
                InReview,
                &[Accepted, Rejected, InRevision, Withdrawn],
            ),
            (Role::Admin, Openness::Open, InRevision, &[InReview]),
            (Role::Admin, Openness::Open, Accepted, &[InRevision, Withdrawn]),
            (Role::Admin, Openness::Open, Rejected, &[InRevision, Withdrawn]),
        ];
        for (role, openness, from, to) in expected {
            assert_eq!(possible_next_states(role, openness, from), to);
        }

        let edges: usize = CONTEXTS
            .iter()
            .take(3)
            .map(|(role, openness)| {
                active_transitions(*role, *openness)
                    .iter()
                    .map(|(_, next)| next.len())
                    .sum::<usize>()
            })
            .sum();
        assert_eq!(edges, 4 + 1 + 10);
    }
}
