//! Intake steps and the directed graph that connects them.
//!
//! The graph is data, not a `match` fallthrough: every step has a node with
//! its forward targets and the rule used to infer its predecessor, so the
//! back resolver is total by construction and checkable by test.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum IntakeStep {
    Welcome,
    RecipientSelection,
    FriendSelected,
    ManualInput,
    InviteFriend,
    SignupPrompt,
    /// Recipient confirmation, voiced by the advisor.
    NicoleAutoGift,
    Occasion,
    Budget,
    Generating,
    Results,
    ResultsPreview,
    AutoGiftSetup,
}

impl IntakeStep {
    pub const ALL: [IntakeStep; 13] = [
        IntakeStep::Welcome,
        IntakeStep::RecipientSelection,
        IntakeStep::FriendSelected,
        IntakeStep::ManualInput,
        IntakeStep::InviteFriend,
        IntakeStep::SignupPrompt,
        IntakeStep::NicoleAutoGift,
        IntakeStep::Occasion,
        IntakeStep::Budget,
        IntakeStep::Generating,
        IntakeStep::Results,
        IntakeStep::ResultsPreview,
        IntakeStep::AutoGiftSetup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntakeStep::Welcome => "welcome",
            IntakeStep::RecipientSelection => "recipient-selection",
            IntakeStep::FriendSelected => "friend-selected",
            IntakeStep::ManualInput => "manual-input",
            IntakeStep::InviteFriend => "invite-friend",
            IntakeStep::SignupPrompt => "signup-prompt",
            IntakeStep::NicoleAutoGift => "nicole-auto-gift",
            IntakeStep::Occasion => "occasion",
            IntakeStep::Budget => "budget",
            IntakeStep::Generating => "generating",
            IntakeStep::Results => "results",
            IntakeStep::ResultsPreview => "results-preview",
            IntakeStep::AutoGiftSetup => "auto-gift-setup",
        }
    }

    /// Terminal steps reached once a query has been synthesized.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            IntakeStep::Results | IntakeStep::ResultsPreview | IntakeStep::AutoGiftSetup
        )
    }

    pub fn node(&self) -> &'static StepNode {
        // INTAKE_GRAPH is declared in `ALL` order.
        &INTAKE_GRAPH[*self as usize]
    }
}

impl fmt::Display for IntakeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntakeStep {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntakeStep::ALL
            .iter()
            .copied()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| AppError::InvalidTransition(format!("unknown intake step '{s}'")))
    }
}

/// How the predecessor of a step is derived from the session record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredecessorRule {
    /// Entry point; back stays put.
    Root,
    Fixed(IntakeStep),
    /// friend-selected, invite-friend or manual-input, whichever filled the recipient.
    RecipientSource,
    /// The recipient entry step the auth gate interrupted.
    InterruptedOrigin,
}

#[derive(Debug)]
pub struct StepNode {
    pub step: IntakeStep,
    pub forward: &'static [IntakeStep],
    pub predecessor: PredecessorRule,
}

use IntakeStep::*;

pub static INTAKE_GRAPH: [StepNode; 13] = [
    StepNode {
        step: Welcome,
        forward: &[RecipientSelection],
        predecessor: PredecessorRule::Root,
    },
    StepNode {
        step: RecipientSelection,
        forward: &[FriendSelected, ManualInput, InviteFriend, NicoleAutoGift, SignupPrompt],
        predecessor: PredecessorRule::Fixed(Welcome),
    },
    StepNode {
        step: FriendSelected,
        forward: &[NicoleAutoGift, SignupPrompt],
        predecessor: PredecessorRule::Fixed(RecipientSelection),
    },
    StepNode {
        step: ManualInput,
        forward: &[NicoleAutoGift, SignupPrompt],
        predecessor: PredecessorRule::Fixed(RecipientSelection),
    },
    StepNode {
        step: InviteFriend,
        forward: &[NicoleAutoGift, SignupPrompt],
        predecessor: PredecessorRule::Fixed(RecipientSelection),
    },
    StepNode {
        step: SignupPrompt,
        forward: &[NicoleAutoGift, InviteFriend],
        predecessor: PredecessorRule::InterruptedOrigin,
    },
    StepNode {
        step: NicoleAutoGift,
        forward: &[Occasion],
        predecessor: PredecessorRule::RecipientSource,
    },
    StepNode {
        step: Occasion,
        forward: &[Budget],
        predecessor: PredecessorRule::Fixed(NicoleAutoGift),
    },
    StepNode {
        step: Budget,
        forward: &[Generating],
        predecessor: PredecessorRule::Fixed(Occasion),
    },
    StepNode {
        step: Generating,
        forward: &[Results, ResultsPreview],
        predecessor: PredecessorRule::Fixed(Budget),
    },
    StepNode {
        step: Results,
        forward: &[AutoGiftSetup],
        predecessor: PredecessorRule::Fixed(Budget),
    },
    StepNode {
        step: ResultsPreview,
        forward: &[],
        predecessor: PredecessorRule::Fixed(Budget),
    },
    StepNode {
        step: AutoGiftSetup,
        forward: &[],
        predecessor: PredecessorRule::Fixed(Results),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_is_indexed_in_declaration_order() {
        for step in IntakeStep::ALL {
            assert_eq!(step.node().step, step);
        }
    }

    #[test]
    fn test_fixed_predecessors_are_reachable_parents() {
        // A fixed predecessor must be a step (or a step chain through
        // `generating`) that leads forward into the node.
        for node in INTAKE_GRAPH.iter() {
            if let PredecessorRule::Fixed(parent) = node.predecessor {
                let direct = parent.node().forward.contains(&node.step);
                let via_generating = parent == Budget
                    && Generating.node().forward.contains(&node.step);
                assert!(
                    direct || via_generating,
                    "{} is not reachable from its predecessor {}",
                    node.step,
                    parent
                );
            }
        }
    }

    #[test]
    fn test_step_names_round_trip() {
        for step in IntakeStep::ALL {
            assert_eq!(step.as_str().parse::<IntakeStep>().unwrap(), step);
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(json, format!("\"{}\"", step.as_str()));
        }
        assert!("checkout".parse::<IntakeStep>().is_err());
    }
}
