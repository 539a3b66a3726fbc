//! Auto-gift setup wizard: a stepper whose length depends on what the user
//! has chosen so far, ending in a multi-record submission.

pub mod state;
pub mod stepper;
pub mod steps;
pub mod submission;

pub use state::{OccasionEntry, ShippingAddress, WizardPatch, WizardRecipient, WizardState};
pub use stepper::{StepOutcome, WizardStepper};
pub use steps::{derive_steps, total_steps, StepDescriptor, WizardStepKind, BASE_STEPS};
pub use submission::{CommittedOccasion, OccasionFailure, SubmissionReport};
