use super::state::{WizardPatch, WizardState};
use super::steps::{derive_steps, total_steps, validate_step, StepDescriptor};
use super::submission::{self, SubmissionReport};
use crate::config::AdvisorConfig;
use crate::engine::collaborators::Collaborators;
use crate::error::AppError;
use crate::notifications::{self, NonFatal};

/// What `complete_step` did.
#[derive(Debug)]
pub enum StepOutcome {
    Advanced { step: usize },
    /// The last step was completed and submission ran.
    Submitted(SubmissionReport),
}

/// Drives the auto-gift wizard dialog. `step` is 1-based and always within
/// `1..=total_steps`.
pub struct WizardStepper {
    collaborators: Collaborators,
    default_notification_days: Vec<u32>,
    step: usize,
    state: WizardState,
}

impl WizardStepper {
    pub fn new(collaborators: Collaborators, config: &AdvisorConfig) -> Self {
        Self::with_state(collaborators, config, WizardState::default())
    }

    /// Open the wizard pre-filled, e.g. from an advisor conversation.
    pub fn with_state(
        collaborators: Collaborators,
        config: &AdvisorConfig,
        state: WizardState,
    ) -> Self {
        Self {
            collaborators,
            default_notification_days: config.default_notification_days.clone(),
            step: 1,
            state,
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn steps(&self) -> Vec<StepDescriptor> {
        derive_steps(&self.state)
    }

    pub fn total_steps(&self) -> usize {
        total_steps(&self.state)
    }

    pub fn current(&self) -> Option<StepDescriptor> {
        self.steps().into_iter().find(|d| d.index == self.step)
    }

    /// Merge `patch` from step `index`, then advance or, on the last step, submit.
    pub async fn complete_step(
        &mut self,
        index: usize,
        patch: WizardPatch,
    ) -> Result<StepOutcome, AppError> {
        if index != self.step {
            return Err(AppError::InvalidTransition(format!(
                "step {index} completed while on step {}",
                self.step
            )));
        }

        self.state.apply(patch);
        let total = self.total_steps();
        self.step = self.step.clamp(1, total);

        let Some(current) = self.current() else {
            return Err(AppError::Internal(format!("no step at index {}", self.step)));
        };
        validate_step(current.kind, &self.state)?;

        if self.step < total {
            self.step += 1;
            tracing::debug!(step = self.step, total, "Wizard advanced");
            return Ok(StepOutcome::Advanced { step: self.step });
        }

        self.submit().await.map(StepOutcome::Submitted)
    }

    /// Keep what was typed on this step and go back one.
    pub fn save_and_back(&mut self, patch: WizardPatch) -> usize {
        self.state.apply(patch);
        self.step = self.step.saturating_sub(1).clamp(1, self.total_steps());
        self.step
    }

    /// Return to an empty wizard on step 1.
    pub fn close(&mut self) {
        self.state = WizardState::default();
        self.step = 1;
    }

    async fn submit(&mut self) -> Result<SubmissionReport, AppError> {
        let notifier = self.collaborators.notifier.as_ref();
        let report = match submission::submit(
            &self.collaborators,
            &self.state,
            &self.default_notification_days,
        )
        .await
        {
            Ok(report) => report,
            Err(error) => {
                notifications::report(notifier, NonFatal::SubmissionAborted { error: &error });
                return Err(error);
            }
        };

        if report.is_complete() {
            notifications::notify_success(
                notifier,
                &format!("Auto-gifting is set up for {}.", self.state.recipient.name),
            );
            self.close();
        } else {
            notifications::report(
                notifier,
                NonFatal::SubmissionPartial {
                    failed: report.failures.len(),
                    total: report.total(),
                },
            );
            // Only the failed entries stay behind for a retry.
            self.state.occasions = report.failures.iter().map(|f| f.entry.clone()).collect();
            self.state.recipient.connection_id = Some(report.connection_id.clone());
        }
        Ok(report)
    }
}
