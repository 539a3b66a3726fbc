//! The conversational intake machine.
//!
//! One instance per open advisor conversation. It owns the session record,
//! merges patches before switching steps, and runs the guarded forward
//! transitions (auth gate, best-effort persistence, synthesis). Hosts observe
//! it through a `watch` channel and drive it with the command methods.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use uuid::Uuid;

use super::navigation::resolve_back;
use super::prompts::advisor_prompt;
use super::state::{
    BudgetRange, FriendProfile, IntakePatch, IntakeState, InvitedFriend, PendingFriendData,
    RecipientDetails,
};
use super::step::IntakeStep;
use super::synthesis::{synthesize, SynthesizedQuery};
use crate::config::AdvisorConfig;
use crate::db::models::{CreateConnectionInput, PreferencesPatch};
use crate::engine::collaborators::{Collaborators, PreferenceStore};
use crate::engine::wizard::WizardState;
use crate::error::AppError;
use crate::notifications::{self, NonFatal};
use crate::validation;

/// What a guarded transition did.
#[derive(Debug)]
pub enum TransitionOutcome {
    Moved { to: IntakeStep },
    /// The auth gate sent the user to sign up; `pending` is replayed afterwards.
    Redirected { to: IntakeStep, pending: IntakeStep },
    /// Moved on, but best-effort persistence failed (already notified).
    MovedWithWarning { to: IntakeStep, error: AppError },
    /// Stayed put after a failure the user can retry (already notified).
    Held { at: IntakeStep, error: AppError },
    /// Nothing applied: stale result or nothing to do.
    Ignored { reason: &'static str },
}

impl TransitionOutcome {
    /// Step the machine is on after this outcome, when it changed or held.
    pub fn step(&self) -> Option<IntakeStep> {
        match self {
            TransitionOutcome::Moved { to }
            | TransitionOutcome::Redirected { to, .. }
            | TransitionOutcome::MovedWithWarning { to, .. } => Some(*to),
            TransitionOutcome::Held { at, .. } => Some(*at),
            TransitionOutcome::Ignored { .. } => None,
        }
    }
}

/// A synthesis run detached from the machine, so the host can await the
/// pacing delay without holding the machine borrowed.
pub struct GenerationTicket {
    session_id: Uuid,
    generation: u64,
    state: IntakeState,
    user_id: Option<String>,
    delay: Duration,
    preferences: Arc<dyn PreferenceStore>,
}

#[derive(Debug)]
pub struct GenerationOutcome {
    session_id: Uuid,
    generation: u64,
    result: Result<SynthesizedQuery, AppError>,
}

impl GenerationTicket {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Wait out the pacing delay, synthesize, and save the search for signed-in users.
    pub async fn run(self) -> GenerationOutcome {
        tokio::time::sleep(self.delay).await;

        let synthesized = synthesize(&self.state);
        let result = match &self.user_id {
            Some(user_id) => self
                .preferences
                .save_search(
                    user_id,
                    &synthesized,
                    self.state.occasion.as_deref(),
                    self.state.budget,
                )
                .await
                .map(|saved| {
                    tracing::debug!(search_id = %saved.id, "Search saved");
                    synthesized
                }),
            None => Ok(synthesized),
        };

        GenerationOutcome {
            session_id: self.session_id,
            generation: self.generation,
            result,
        }
    }
}

pub struct IntakeMachine {
    collaborators: Collaborators,
    generation_delay: Duration,
    session_id: Uuid,
    state: IntakeState,
    generation: u64,
    generation_in_flight: bool,
    tx: watch::Sender<IntakeState>,
}

impl IntakeMachine {
    pub fn new(collaborators: Collaborators, config: &AdvisorConfig) -> Self {
        let state = IntakeState {
            is_authenticated: collaborators.auth.is_authenticated(),
            ..IntakeState::default()
        };
        let (tx, _rx) = watch::channel(state.clone());
        let session_id = Uuid::new_v4();
        tracing::debug!(%session_id, "Advisor conversation opened");

        Self {
            collaborators,
            generation_delay: config.generation_delay(),
            session_id,
            state,
            generation: 0,
            generation_in_flight: false,
            tx,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> &IntakeState {
        &self.state
    }

    pub fn step(&self) -> IntakeStep {
        self.state.step
    }

    /// Read-only feed of the session record, updated after every transition.
    pub fn subscribe(&self) -> watch::Receiver<IntakeState> {
        self.tx.subscribe()
    }

    /// The advisor's line for the current step.
    pub fn prompt(&self) -> String {
        advisor_prompt(self.state.step, &self.state)
    }

    // ── Core commands ──────────────────────────────────────────────

    /// Merge `patch`, re-read auth, switch to `step`. A budget in `patch`
    /// must satisfy `0 <= min <= max`; nothing is applied otherwise.
    pub fn advance(&mut self, step: IntakeStep, patch: IntakePatch) -> Result<(), AppError> {
        if let Some(budget) = &patch.budget {
            validation::require_budget_range(budget.min, budget.max)?;
        }
        self.transition(step, patch);
        Ok(())
    }

    /// [`advance`](Self::advance) for hosts that carry step names as strings.
    pub fn advance_named(&mut self, step: &str, patch: IntakePatch) -> Result<(), AppError> {
        let step = step.parse::<IntakeStep>()?;
        self.advance(step, patch)
    }

    fn transition(&mut self, step: IntakeStep, patch: IntakePatch) {
        let from = self.state.step;
        self.state.apply(patch);
        self.state.is_authenticated = self.collaborators.auth.is_authenticated();
        self.state.step = step;
        if from == IntakeStep::Generating && step != IntakeStep::Generating {
            self.generation_in_flight = false;
        }
        tracing::debug!(session_id = %self.session_id, %from, to = %step, "Intake transition");
        self.publish();
    }

    /// Go to the inferred predecessor. Never clears a slot.
    pub fn back(&mut self) -> IntakeStep {
        let target = resolve_back(self.state.step, &self.state);
        self.transition(target, IntakePatch::default());
        target
    }

    /// Close the conversation: fresh session id, empty record. Results of
    /// work started under the old session are discarded when they arrive.
    pub fn reset(&mut self) {
        let old = self.session_id;
        self.session_id = Uuid::new_v4();
        self.generation_in_flight = false;
        self.state = IntakeState {
            is_authenticated: self.collaborators.auth.is_authenticated(),
            ..IntakeState::default()
        };
        tracing::debug!(old_session = %old, session_id = %self.session_id, "Advisor conversation reset");
        self.publish();
    }

    // ── Recipient ──────────────────────────────────────────────────

    /// Commit a friend from the user's connections as the recipient.
    pub async fn commit_friend(
        &mut self,
        friend: FriendProfile,
    ) -> Result<TransitionOutcome, AppError> {
        validation::require_non_empty("friend name", &friend.name)?;
        self.replace_recipient();
        Ok(self.pass_recipient_gate(IntakePatch::friend(friend)).await)
    }

    /// Commit a hand-entered recipient.
    pub async fn commit_recipient_details(
        &mut self,
        details: RecipientDetails,
    ) -> Result<TransitionOutcome, AppError> {
        details.validate()?;
        self.replace_recipient();
        Ok(self.pass_recipient_gate(IntakePatch::details(details)).await)
    }

    /// Invite someone who is not yet a connection and use them as the recipient.
    pub async fn commit_invitation(
        &mut self,
        data: PendingFriendData,
    ) -> Result<TransitionOutcome, AppError> {
        data.validate()?;
        self.replace_recipient();
        let patch = IntakePatch {
            pending_friend_data: Some(data),
            ..IntakePatch::default()
        };
        Ok(self.send_invitation(patch).await)
    }

    /// Replay whatever the auth gate interrupted, once the user has signed in.
    pub async fn resume_pending_action(&mut self) -> TransitionOutcome {
        let Some(pending) = self.state.pending_action else {
            return self.ignore("no pending action");
        };
        if !self.collaborators.auth.is_authenticated() {
            self.state.is_authenticated = false;
            self.publish();
            return self.ignore("still unauthenticated");
        }

        tracing::info!(session_id = %self.session_id, %pending, "Replaying pending action after sign-in");
        match pending {
            IntakeStep::NicoleAutoGift => self.pass_recipient_gate(IntakePatch::default()).await,
            IntakeStep::InviteFriend => self.send_invitation(IntakePatch::default()).await,
            other => {
                self.state.pending_action = None;
                self.transition(other, IntakePatch::default());
                self.settle(TransitionOutcome::Moved { to: other }, "")
            }
        }
    }

    async fn pass_recipient_gate(&mut self, mut patch: IntakePatch) -> TransitionOutcome {
        let Some(user_id) = self.collaborators.auth.current_user_id() else {
            patch.pending_action = Some(IntakeStep::NicoleAutoGift);
            self.transition(IntakeStep::SignupPrompt, patch);
            return self.settle(
                TransitionOutcome::Redirected {
                    to: IntakeStep::SignupPrompt,
                    pending: IntakeStep::NicoleAutoGift,
                },
                "",
            );
        };

        // The patch names the slot being committed; a replay commits whatever the session holds.
        let (friend, details) =
            if patch.selected_friend.is_some() || patch.recipient_details.is_some() {
                (patch.selected_friend.clone(), patch.recipient_details.clone())
            } else {
                (
                    self.state.selected_friend.clone(),
                    self.state.recipient_details.clone(),
                )
            };

        let persisted = match (friend, details) {
            (Some(friend), _) => self
                .collaborators
                .preferences
                .update_preferences(
                    &user_id,
                    PreferencesPatch {
                        last_recipient_id: Some(friend.id),
                        ..PreferencesPatch::default()
                    },
                )
                .await
                .map(|_| ()),
            (None, Some(details)) => self
                .collaborators
                .preferences
                .save_recipient_profile(&user_id, &details)
                .await
                .map(|_| ()),
            (None, None) => Ok(()),
        };

        self.state.pending_action = None;
        self.transition(IntakeStep::NicoleAutoGift, patch);
        self.after_best_effort(IntakeStep::NicoleAutoGift, "recipient", persisted)
    }

    async fn send_invitation(&mut self, mut patch: IntakePatch) -> TransitionOutcome {
        let Some(data) = patch
            .pending_friend_data
            .clone()
            .or_else(|| self.state.pending_friend_data.clone())
        else {
            return self.ignore("no invitation to send");
        };

        let Some(user_id) = self.collaborators.auth.current_user_id() else {
            patch.pending_action = Some(IntakeStep::InviteFriend);
            self.transition(IntakeStep::SignupPrompt, patch);
            return self.settle(
                TransitionOutcome::Redirected {
                    to: IntakeStep::SignupPrompt,
                    pending: IntakeStep::InviteFriend,
                },
                "",
            );
        };

        let input = CreateConnectionInput {
            name: data.name.clone(),
            email: Some(data.email.clone()),
            relationship: data.relationship.clone(),
        };
        match self
            .collaborators
            .connections
            .create_pending_connection(&user_id, &input)
            .await
        {
            Ok(connection) => {
                tracing::info!(connection_id = %connection.id, "Invitation recorded as pending connection");
                patch.pending_friend_data = None;
                patch.invited_friend = Some(InvitedFriend {
                    connection_id: connection.id,
                    name: data.name.clone(),
                    email: data.email,
                    relationship: data.relationship.clone(),
                });
                patch.recipient_details = Some(RecipientDetails {
                    name: data.name,
                    relationship: data.relationship,
                    ..RecipientDetails::default()
                });
                self.state.pending_friend_data = None;
                self.state.pending_action = None;
                self.transition(IntakeStep::NicoleAutoGift, patch);
                self.settle(
                    TransitionOutcome::Moved {
                        to: IntakeStep::NicoleAutoGift,
                    },
                    "",
                )
            }
            Err(error) => {
                self.state.pending_action = None;
                self.transition(IntakeStep::InviteFriend, patch);
                self.settle(
                    TransitionOutcome::Held {
                        at: IntakeStep::InviteFriend,
                        error,
                    },
                    &data.name,
                )
            }
        }
    }

    // ── Occasion & budget ──────────────────────────────────────────

    pub async fn commit_occasion(
        &mut self,
        occasion: &str,
    ) -> Result<TransitionOutcome, AppError> {
        let occasion = occasion.trim();
        validation::require_non_empty("occasion", occasion)?;

        let persisted = self
            .persist_preferences(PreferencesPatch {
                preferred_occasion: Some(occasion.to_string()),
                ..PreferencesPatch::default()
            })
            .await;

        self.transition(IntakeStep::Budget, IntakePatch::occasion(occasion));
        Ok(self.after_best_effort(IntakeStep::Budget, "occasion", persisted))
    }

    /// Commit the budget and enter the generating step.
    pub async fn commit_budget(
        &mut self,
        budget: BudgetRange,
    ) -> Result<TransitionOutcome, AppError> {
        validation::require_budget_range(budget.min, budget.max)?;

        let persisted = self
            .persist_preferences(PreferencesPatch {
                budget_min: Some(budget.min),
                budget_max: Some(budget.max),
                ..PreferencesPatch::default()
            })
            .await;

        self.transition(IntakeStep::Generating, IntakePatch::budget(budget));
        Ok(self.after_best_effort(IntakeStep::Generating, "budget", persisted))
    }

    async fn persist_preferences(&self, patch: PreferencesPatch) -> Result<(), AppError> {
        match self.collaborators.auth.current_user_id() {
            Some(user_id) => self
                .collaborators
                .preferences
                .update_preferences(&user_id, patch)
                .await
                .map(|_| ()),
            None => {
                tracing::debug!(session_id = %self.session_id, "No signed-in user, preferences not persisted");
                Ok(())
            }
        }
    }

    // ── Generation ─────────────────────────────────────────────────

    /// Arm a synthesis run. `None` unless on the generating step with no run in flight.
    pub fn begin_generation(&mut self) -> Option<GenerationTicket> {
        if self.state.step != IntakeStep::Generating || self.generation_in_flight {
            return None;
        }
        if !self.state.has_recipient() {
            tracing::warn!(session_id = %self.session_id, "Generating without a recipient");
        }

        self.generation += 1;
        self.generation_in_flight = true;
        Some(GenerationTicket {
            session_id: self.session_id,
            generation: self.generation,
            state: self.state.clone(),
            user_id: self.collaborators.auth.current_user_id(),
            delay: self.generation_delay,
            preferences: Arc::clone(&self.collaborators.preferences),
        })
    }

    /// Apply a finished run. Results from a reset session, a superseded run,
    /// or after the user left the generating step are dropped.
    pub fn finish_generation(&mut self, outcome: GenerationOutcome) -> TransitionOutcome {
        if outcome.session_id != self.session_id {
            return self.ignore("result belongs to a closed conversation");
        }
        if outcome.generation != self.generation
            || !self.generation_in_flight
            || self.state.step != IntakeStep::Generating
        {
            return self.ignore("result superseded");
        }
        self.generation_in_flight = false;

        match outcome.result {
            Ok(synthesized) => {
                let to = if self.collaborators.auth.is_authenticated() {
                    IntakeStep::Results
                } else {
                    IntakeStep::ResultsPreview
                };
                tracing::info!(session_id = %self.session_id, query = %synthesized.query, "Search synthesized");
                self.transition(
                    to,
                    IntakePatch {
                        search_query: Some(synthesized.query),
                        search_context: Some(synthesized.context),
                        ..IntakePatch::default()
                    },
                );
                self.settle(TransitionOutcome::Moved { to }, "")
            }
            Err(error) => self.settle(
                TransitionOutcome::Held {
                    at: IntakeStep::Generating,
                    error,
                },
                "search",
            ),
        }
    }

    /// Begin, run and finish a synthesis in one call.
    pub async fn generate(&mut self) -> TransitionOutcome {
        let Some(ticket) = self.begin_generation() else {
            return self.ignore("not ready to generate");
        };
        let outcome = ticket.run().await;
        self.finish_generation(outcome)
    }

    // ── Hand-off ───────────────────────────────────────────────────

    /// Leave the results for auto-gift setup, returning a wizard seeded from the session.
    pub fn start_auto_gift_setup(&mut self) -> Result<WizardState, AppError> {
        if self.state.step != IntakeStep::Results {
            return Err(AppError::InvalidTransition(format!(
                "auto-gift setup starts from results, not {}",
                self.state.step
            )));
        }
        let seed = WizardState::seeded_from(&self.state);
        self.transition(IntakeStep::AutoGiftSetup, IntakePatch::default());
        Ok(seed)
    }

    // ── Internals ──────────────────────────────────────────────────

    /// A recipient commit replaces the whole recipient slot, whichever
    /// source filled it before.
    fn replace_recipient(&mut self) {
        self.state.selected_friend = None;
        self.state.recipient_details = None;
        self.state.invited_friend = None;
        self.state.pending_friend_data = None;
    }

    fn after_best_effort(
        &self,
        to: IntakeStep,
        slot: &str,
        persisted: Result<(), AppError>,
    ) -> TransitionOutcome {
        let outcome = match persisted {
            Ok(()) => TransitionOutcome::Moved { to },
            Err(error) => TransitionOutcome::MovedWithWarning { to, error },
        };
        self.settle(outcome, slot)
    }

    /// Log an outcome and turn its error, if any, into one notification.
    /// `subject` names the slot or invitee the failure concerns.
    fn settle(&self, outcome: TransitionOutcome, subject: &str) -> TransitionOutcome {
        let notifier = self.collaborators.notifier.as_ref();
        match &outcome {
            TransitionOutcome::Moved { to } => {
                tracing::debug!(session_id = %self.session_id, %to, "Transition settled");
            }
            TransitionOutcome::Redirected { to, pending } => {
                tracing::info!(session_id = %self.session_id, %to, %pending, "Auth gate redirected");
            }
            TransitionOutcome::MovedWithWarning { error, .. } => {
                notifications::report(notifier, NonFatal::SlotNotSaved { slot: subject, error });
            }
            TransitionOutcome::Held {
                at: IntakeStep::InviteFriend,
                error,
            } => {
                notifications::report(notifier, NonFatal::InvitationNotSent { name: subject, error });
            }
            TransitionOutcome::Held { error, .. } => {
                notifications::report(notifier, NonFatal::SearchNotSaved { error });
            }
            TransitionOutcome::Ignored { reason } => {
                tracing::debug!(session_id = %self.session_id, reason, "Transition ignored");
            }
        }
        outcome
    }

    fn ignore(&self, reason: &'static str) -> TransitionOutcome {
        self.settle(TransitionOutcome::Ignored { reason }, "")
    }

    fn publish(&self) {
        self.tx.send_replace(self.state.clone());
    }
}
