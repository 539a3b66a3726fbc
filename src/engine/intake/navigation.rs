//! Back navigation.
//!
//! Steps are also entered by jumps (resuming after the sign-up detour, deep
//! state changes from the host), so there is no history to pop. The
//! predecessor is re-derived from which optional slots are filled.

use super::state::IntakeState;
use super::step::{IntakeStep, PredecessorRule};

/// The step shown when the user asks to go back from `current`.
pub fn resolve_back(current: IntakeStep, state: &IntakeState) -> IntakeStep {
    match current.node().predecessor {
        PredecessorRule::Root => current,
        PredecessorRule::Fixed(step) => step,
        PredecessorRule::RecipientSource => recipient_source(state),
        PredecessorRule::InterruptedOrigin => interrupted_origin(state),
    }
}

fn recipient_source(state: &IntakeState) -> IntakeStep {
    if state.selected_friend.is_some() {
        IntakeStep::FriendSelected
    } else if state.invited_friend.is_some() {
        IntakeStep::InviteFriend
    } else {
        IntakeStep::ManualInput
    }
}

fn interrupted_origin(state: &IntakeState) -> IntakeStep {
    if state.pending_action == Some(IntakeStep::InviteFriend) {
        IntakeStep::InviteFriend
    } else if state.selected_friend.is_some() {
        IntakeStep::FriendSelected
    } else if state.pending_friend_data.is_some() {
        IntakeStep::InviteFriend
    } else if state.recipient_details.is_some() {
        IntakeStep::ManualInput
    } else {
        IntakeStep::RecipientSelection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::intake::state::{FriendProfile, InvitedFriend, RecipientDetails};

    fn with_friend() -> IntakeState {
        IntakeState {
            selected_friend: Some(FriendProfile {
                id: "c1".into(),
                name: "Sam".into(),
                ..FriendProfile::default()
            }),
            ..IntakeState::default()
        }
    }

    fn with_details() -> IntakeState {
        IntakeState {
            recipient_details: Some(RecipientDetails {
                name: "Alex".into(),
                relationship: "sibling".into(),
                ..RecipientDetails::default()
            }),
            ..IntakeState::default()
        }
    }

    #[test]
    fn test_fixed_table() {
        let s = IntakeState::default();
        assert_eq!(resolve_back(IntakeStep::RecipientSelection, &s), IntakeStep::Welcome);
        assert_eq!(resolve_back(IntakeStep::FriendSelected, &s), IntakeStep::RecipientSelection);
        assert_eq!(resolve_back(IntakeStep::ManualInput, &s), IntakeStep::RecipientSelection);
        assert_eq!(resolve_back(IntakeStep::Occasion, &s), IntakeStep::NicoleAutoGift);
        assert_eq!(resolve_back(IntakeStep::Budget, &s), IntakeStep::Occasion);
        assert_eq!(resolve_back(IntakeStep::Results, &s), IntakeStep::Budget);
        assert_eq!(resolve_back(IntakeStep::Welcome, &s), IntakeStep::Welcome);
    }

    #[test]
    fn test_confirmation_back_depends_on_recipient_source() {
        assert_eq!(
            resolve_back(IntakeStep::NicoleAutoGift, &with_friend()),
            IntakeStep::FriendSelected
        );
        assert_eq!(
            resolve_back(IntakeStep::NicoleAutoGift, &with_details()),
            IntakeStep::ManualInput
        );
        assert_eq!(
            resolve_back(IntakeStep::NicoleAutoGift, &IntakeState::default()),
            IntakeStep::ManualInput
        );
    }

    #[test]
    fn test_friend_wins_when_both_sources_set() {
        let mut state = with_details();
        state.selected_friend = with_friend().selected_friend;
        assert_eq!(
            resolve_back(IntakeStep::NicoleAutoGift, &state),
            IntakeStep::FriendSelected
        );
    }

    #[test]
    fn test_invited_friend_returns_to_invite_form() {
        let mut state = with_details();
        state.invited_friend = Some(InvitedFriend {
            connection_id: "c9".into(),
            name: "Alex".into(),
            email: "alex@example.com".into(),
            relationship: "sibling".into(),
        });
        assert_eq!(
            resolve_back(IntakeStep::NicoleAutoGift, &state),
            IntakeStep::InviteFriend
        );
    }

    #[test]
    fn test_signup_prompt_returns_to_interrupted_entry() {
        assert_eq!(
            resolve_back(IntakeStep::SignupPrompt, &with_friend()),
            IntakeStep::FriendSelected
        );
        assert_eq!(
            resolve_back(IntakeStep::SignupPrompt, &with_details()),
            IntakeStep::ManualInput
        );
        assert_eq!(
            resolve_back(IntakeStep::SignupPrompt, &IntakeState::default()),
            IntakeStep::RecipientSelection
        );
    }

    #[test]
    fn test_interrupted_invitation_wins_over_stale_friend() {
        let mut state = with_friend();
        state.pending_action = Some(IntakeStep::InviteFriend);
        assert_eq!(
            resolve_back(IntakeStep::SignupPrompt, &state),
            IntakeStep::InviteFriend
        );
        state.pending_action = Some(IntakeStep::NicoleAutoGift);
        assert_eq!(
            resolve_back(IntakeStep::SignupPrompt, &state),
            IntakeStep::FriendSelected
        );
    }

    #[test]
    fn test_every_step_resolves_to_a_known_step() {
        for state in [IntakeState::default(), with_friend(), with_details()] {
            for step in IntakeStep::ALL {
                let prev = resolve_back(step, &state);
                assert!(IntakeStep::ALL.contains(&prev));
                if step != IntakeStep::Welcome {
                    assert_ne!(prev, step, "{step} resolves to itself");
                }
            }
        }
    }
}
