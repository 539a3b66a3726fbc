//! Query synthesis: fold a completed session into a marketplace search.
//!
//! Pure and total. No clock, no randomness, no I/O; the same state always
//! produces the same bytes.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::state::IntakeState;

/// Structured search context handed to ranking, independent of the query text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SearchContext {
    pub recipient_name: Option<String>,
    pub relationship: Option<String>,
    pub interests: Vec<String>,
    pub occasion: Option<String>,
    /// `[min, max]` in dollars.
    pub budget: Option<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizedQuery {
    pub query: String,
    pub context: SearchContext,
}

/// Build the query string and context from the session.
///
/// Clause order is fixed: recipient, occasion, budget. A session with no
/// recipient still yields a (degenerate) result; callers are expected to
/// keep users from reaching generation without one.
pub fn synthesize(state: &IntakeState) -> SynthesizedQuery {
    let mut context = SearchContext::default();
    let mut clauses: Vec<String> = Vec::with_capacity(3);

    if let Some(friend) = &state.selected_friend {
        clauses.push(format!("gifts for {}", friend.name));
        context.recipient_name = Some(friend.name.clone());
        context.relationship = friend.relationship.clone();
        context.interests = friend.interests.clone();
    } else if let Some(details) = &state.recipient_details {
        clauses.push(format!("gifts for {}", details.name));
        context.recipient_name = Some(details.name.clone());
        context.relationship = Some(details.relationship.clone());
        context.interests = details.interests.clone();
    }

    if let Some(occasion) = &state.occasion {
        clauses.push(occasion.clone());
        context.occasion = Some(occasion.clone());
    }

    if let Some(budget) = &state.budget {
        clauses.push(format!("under ${}", format_amount(budget.max)));
        context.budget = Some([budget.min, budget.max]);
    }

    SynthesizedQuery {
        query: clauses.join(" "),
        context,
    }
}

/// Whole dollars print without decimals, anything else with cents.
/// Classified after rounding to the cent.
pub fn format_amount(amount: f64) -> String {
    let cents = (amount * 100.0).round() / 100.0;
    if cents.fract() == 0.0 {
        format!("{cents:.0}")
    } else {
        format!("{cents:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::intake::state::{BudgetRange, FriendProfile, RecipientDetails};

    fn sam() -> FriendProfile {
        FriendProfile {
            id: "c1".into(),
            name: "Sam".into(),
            ..FriendProfile::default()
        }
    }

    fn alex() -> RecipientDetails {
        RecipientDetails {
            name: "Alex".into(),
            age_range: Some("25-34".into()),
            gender: None,
            relationship: "sibling".into(),
            interests: vec!["coffee".into(), "hiking".into()],
        }
    }

    #[test]
    fn test_clause_order() {
        let state = IntakeState {
            selected_friend: Some(sam()),
            occasion: Some("birthday".into()),
            budget: Some(BudgetRange { min: 10.0, max: 50.0 }),
            ..IntakeState::default()
        };
        let out = synthesize(&state);
        assert_eq!(out.query, "gifts for Sam birthday under $50");
        assert_eq!(out.context.budget, Some([10.0, 50.0]));
        assert_eq!(out.context.occasion.as_deref(), Some("birthday"));
    }

    #[test]
    fn test_selected_friend_takes_precedence() {
        let state = IntakeState {
            selected_friend: Some(sam()),
            recipient_details: Some(alex()),
            ..IntakeState::default()
        };
        let out = synthesize(&state);
        assert!(out.query.contains("Sam"));
        assert!(!out.query.contains("Alex"));
        assert_eq!(out.context.recipient_name.as_deref(), Some("Sam"));
        assert!(out.context.interests.is_empty());
    }

    #[test]
    fn test_manual_details_feed_context() {
        let state = IntakeState {
            recipient_details: Some(alex()),
            ..IntakeState::default()
        };
        let out = synthesize(&state);
        assert_eq!(out.query, "gifts for Alex");
        assert_eq!(out.context.relationship.as_deref(), Some("sibling"));
        assert_eq!(out.context.interests, vec!["coffee", "hiking"]);
        assert_eq!(out.context.budget, None);
    }

    #[test]
    fn test_degenerate_state_does_not_fail() {
        let out = synthesize(&IntakeState::default());
        assert_eq!(out.query, "");
        assert_eq!(out.context, SearchContext::default());

        let state = IntakeState {
            occasion: Some("graduation".into()),
            budget: Some(BudgetRange { min: 0.0, max: 25.5 }),
            ..IntakeState::default()
        };
        assert_eq!(synthesize(&state).query, "graduation under $25.50");
    }

    #[test]
    fn test_amount_rounds_to_cents_first() {
        assert_eq!(format_amount(49.999), "50");
        assert_eq!(format_amount(50.0), "50");
        assert_eq!(format_amount(25.5), "25.50");
        assert_eq!(format_amount(19.994), "19.99");
    }

    #[test]
    fn test_deterministic_output() {
        let state = IntakeState {
            recipient_details: Some(alex()),
            occasion: Some("holiday".into()),
            budget: Some(BudgetRange { min: 20.0, max: 80.0 }),
            ..IntakeState::default()
        };
        let a = serde_json::to_string(&synthesize(&state)).unwrap();
        let b = serde_json::to_string(&synthesize(&state)).unwrap();
        assert_eq!(a, b);
    }
}
