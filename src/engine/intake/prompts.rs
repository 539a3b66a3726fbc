//! The advisor's line for each step.

use super::state::IntakeState;
use super::step::IntakeStep;
use super::synthesis::format_amount;

const ADVISOR_NAME: &str = "Nicole";

/// What the advisor says while `step` is on screen.
pub fn advisor_prompt(step: IntakeStep, state: &IntakeState) -> String {
    let who = state.recipient_name().unwrap_or("them");
    match step {
        IntakeStep::Welcome => format!(
            "Hi, I'm {ADVISOR_NAME}! I'll help you find the perfect gift. Who are we shopping for?"
        ),
        IntakeStep::RecipientSelection => {
            "Pick someone from your friends, tell me about them, or invite them to join.".into()
        }
        IntakeStep::FriendSelected => format!("Great choice. Shall we find something for {who}?"),
        IntakeStep::ManualInput => {
            "Tell me a little about them: name, relationship and what they love.".into()
        }
        IntakeStep::InviteFriend => {
            "Send them an invite and I'll remember their details for next time.".into()
        }
        IntakeStep::SignupPrompt => {
            "Create a free account so I can save your recipients. We'll pick up right where you left off."
                .into()
        }
        IntakeStep::NicoleAutoGift => format!(
            "Got it, we're shopping for {who}. I can also handle future occasions automatically."
        ),
        IntakeStep::Occasion => format!("What's the occasion for {who}?"),
        IntakeStep::Budget => match state.occasion.as_deref() {
            Some(occasion) => format!("How much would you like to spend on this {occasion} gift?"),
            None => "How much would you like to spend?".into(),
        },
        IntakeStep::Generating => format!("Finding ideas for {who}..."),
        IntakeStep::Results | IntakeStep::ResultsPreview => match &state.budget {
            Some(budget) => format!(
                "Here are my picks for {who}, all under ${}.",
                format_amount(budget.max)
            ),
            None => format!("Here are my picks for {who}."),
        },
        IntakeStep::AutoGiftSetup => {
            format!("Let's set up auto-gifting so {who} never misses a gift from you.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::intake::state::{BudgetRange, FriendProfile};

    #[test]
    fn test_prompts_are_personalised() {
        let state = IntakeState {
            selected_friend: Some(FriendProfile {
                id: "c1".into(),
                name: "Sam".into(),
                ..FriendProfile::default()
            }),
            occasion: Some("birthday".into()),
            budget: Some(BudgetRange { min: 10.0, max: 50.0 }),
            ..IntakeState::default()
        };
        assert_eq!(advisor_prompt(IntakeStep::Occasion, &state), "What's the occasion for Sam?");
        assert!(advisor_prompt(IntakeStep::Budget, &state).contains("birthday"));
        assert!(advisor_prompt(IntakeStep::Results, &state).ends_with("under $50."));
    }

    #[test]
    fn test_every_step_has_a_prompt() {
        let state = IntakeState::default();
        for step in IntakeStep::ALL {
            assert!(!advisor_prompt(step, &state).is_empty());
        }
    }
}
