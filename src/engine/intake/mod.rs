//! Guided intake: the advisor conversation that turns a few answers into a
//! gift search.

pub mod machine;
pub mod navigation;
pub mod prompts;
pub mod state;
pub mod step;
pub mod synthesis;

pub use machine::{GenerationOutcome, GenerationTicket, IntakeMachine, TransitionOutcome};
pub use navigation::resolve_back;
pub use prompts::advisor_prompt;
pub use state::{
    BudgetRange, FriendProfile, IntakePatch, IntakeState, InvitedFriend, PendingFriendData,
    RecipientDetails,
};
pub use step::{IntakeStep, PredecessorRule, StepNode, INTAKE_GRAPH};
pub use synthesis::{synthesize, SearchContext, SynthesizedQuery};
