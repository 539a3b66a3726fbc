//! Property tests for the pure parts of both flows: wizard step derivation,
//! session merges and back navigation.

use gift_advisor::engine::intake::synthesis::format_amount;
use gift_advisor::engine::intake::{
    resolve_back, synthesize, BudgetRange, FriendProfile, IntakePatch, IntakeState, IntakeStep,
    RecipientDetails,
};
use gift_advisor::engine::wizard::{derive_steps, total_steps, WizardPatch, WizardStepKind};
use gift_advisor::WizardState;
use proptest::prelude::*;
use proptest::test_runner::Config;

fn arb_step() -> impl Strategy<Value = IntakeStep> {
    (0..IntakeStep::ALL.len()).prop_map(|i| IntakeStep::ALL[i])
}

fn arb_friend() -> impl Strategy<Value = FriendProfile> {
    ("[a-z]{1,6}", "[A-Z][a-z]{1,8}").prop_map(|(id, name)| FriendProfile {
        id,
        name,
        relationship: None,
        interests: Vec::new(),
    })
}

fn arb_details() -> impl Strategy<Value = RecipientDetails> {
    ("[A-Z][a-z]{1,8}", "[a-z]{3,8}").prop_map(|(name, relationship)| RecipientDetails {
        name,
        relationship,
        ..RecipientDetails::default()
    })
}

fn arb_budget() -> impl Strategy<Value = BudgetRange> {
    (0u32..500, 0u32..500).prop_map(|(a, b)| BudgetRange {
        min: f64::from(a.min(b)),
        max: f64::from(a.max(b)),
    })
}

fn arb_patch() -> impl Strategy<Value = IntakePatch> {
    (
        proptest::option::of(arb_friend()),
        proptest::option::of(arb_details()),
        proptest::option::of("[a-z]{3,12}"),
        proptest::option::of(arb_budget()),
    )
        .prop_map(|(selected_friend, recipient_details, occasion, budget)| IntakePatch {
            selected_friend,
            recipient_details,
            occasion,
            budget,
            ..IntakePatch::default()
        })
}

fn arb_state() -> impl Strategy<Value = IntakeState> {
    (arb_step(), arb_patch()).prop_map(|(step, patch)| {
        let mut state = IntakeState {
            step,
            ..IntakeState::default()
        };
        state.apply(patch);
        state
    })
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn auto_gifting_adds_exactly_one_step(enabled in any::<bool>(), days in proptest::collection::vec(1u32..=60, 0..4)) {
        let mut state = WizardState {
            auto_gifting_enabled: enabled,
            notification_days: days,
            ..WizardState::default()
        };
        let before = total_steps(&state);
        state.apply(WizardPatch { auto_gifting_enabled: Some(true), ..WizardPatch::default() });

        prop_assert_eq!(total_steps(&state), if enabled { before } else { before + 1 });
        let steps = derive_steps(&state);
        prop_assert_eq!(steps.len(), total_steps(&state));
        prop_assert_eq!(steps[steps.len() - 2].kind, WizardStepKind::Payment);
        prop_assert_eq!(steps[steps.len() - 1].kind, WizardStepKind::Review);
        prop_assert!(steps.iter().enumerate().all(|(i, d)| d.index == i + 1));
    }

    #[test]
    fn merge_is_monotonic(state in arb_state(), patch in arb_patch()) {
        let mut merged = state.clone();
        merged.apply(patch.clone());

        match &patch.selected_friend {
            Some(v) => prop_assert_eq!(merged.selected_friend.as_ref(), Some(v)),
            None => prop_assert_eq!(&merged.selected_friend, &state.selected_friend),
        }
        match &patch.recipient_details {
            Some(v) => prop_assert_eq!(merged.recipient_details.as_ref(), Some(v)),
            None => prop_assert_eq!(&merged.recipient_details, &state.recipient_details),
        }
        match &patch.occasion {
            Some(v) => prop_assert_eq!(merged.occasion.as_ref(), Some(v)),
            None => prop_assert_eq!(&merged.occasion, &state.occasion),
        }
        match &patch.budget {
            Some(v) => prop_assert_eq!(merged.budget.as_ref(), Some(v)),
            None => prop_assert_eq!(&merged.budget, &state.budget),
        }
        prop_assert_eq!(merged.step, state.step);
    }

    #[test]
    fn back_always_has_a_target(state in arb_state()) {
        let target = resolve_back(state.step, &state);
        prop_assert!(IntakeStep::ALL.contains(&target));
        if state.step == IntakeStep::Welcome {
            prop_assert_eq!(target, IntakeStep::Welcome);
        } else {
            prop_assert_ne!(target, state.step);
        }
    }

    #[test]
    fn synthesis_is_deterministic(state in arb_state()) {
        let first = synthesize(&state);
        prop_assert_eq!(&first, &synthesize(&state));
        if let Some(budget) = state.budget {
            let suffix = format!("under ${}", format_amount(budget.max));
            prop_assert!(first.query.ends_with(&suffix));
        }
    }
}
