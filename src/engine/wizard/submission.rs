//! Final submission of the auto-gift wizard.
//!
//! Each occasion entry is its own unit of work: a calendar event, plus a
//! rule when auto-gifting is on. Entries are not rolled back when a later
//! one fails.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::state::{OccasionEntry, WizardState};
use crate::db::models::{
    CreateAutoGiftRuleInput, CreateConnectionInput, GiftCriteria, GiftEventInput,
    RuleNotificationPrefs,
};
use crate::engine::collaborators::Collaborators;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CommittedOccasion {
    pub occasion_type: String,
    pub event_id: String,
    pub rule_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OccasionFailure {
    /// The entry as submitted, kept so it can be retried.
    pub entry: OccasionEntry,
    /// `AppError::kind()` of the failure.
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReport {
    pub connection_id: String,
    pub committed: Vec<CommittedOccasion>,
    pub failures: Vec<OccasionFailure>,
}

impl SubmissionReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> usize {
        self.committed.len() + self.failures.len()
    }
}

/// Submit `state` for the signed-in user.
///
/// Errors only when nothing could be attempted (no user, no entries, or the
/// recipient connection could not be resolved). Per-entry failures land in
/// the report instead.
pub async fn submit(
    collaborators: &Collaborators,
    state: &WizardState,
    default_notification_days: &[u32],
) -> Result<SubmissionReport, AppError> {
    let user_id = collaborators
        .auth
        .current_user_id()
        .ok_or_else(|| AppError::Auth("Sign in to set up auto-gifting".into()))?;
    if state.occasions.is_empty() {
        return Err(AppError::Validation("Add at least one occasion".into()));
    }

    let connection_id = match &state.recipient.connection_id {
        Some(id) => id.clone(),
        None => {
            let connection = collaborators
                .connections
                .create_pending_connection(
                    &user_id,
                    &CreateConnectionInput {
                        name: state.recipient.name.clone(),
                        email: state.recipient.email.clone(),
                        relationship: state.recipient.relationship.clone(),
                    },
                )
                .await?;
            tracing::info!(connection_id = %connection.id, "Created pending connection for wizard recipient");
            connection.id
        }
    };

    let days = if state.notification_days.is_empty() {
        default_notification_days.to_vec()
    } else {
        state.notification_days.clone()
    };

    let mut report = SubmissionReport {
        connection_id,
        committed: Vec::with_capacity(state.occasions.len()),
        failures: Vec::new(),
    };

    for entry in &state.occasions {
        match commit_occasion(collaborators, &user_id, &report.connection_id, state, entry, &days)
            .await
        {
            Ok(committed) => report.committed.push(committed),
            Err(e) => {
                tracing::warn!(occasion = %entry.occasion_type, error = %e, "Occasion not saved");
                report.failures.push(OccasionFailure {
                    entry: entry.clone(),
                    kind: e.kind().to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        committed = report.committed.len(),
        failed = report.failures.len(),
        "Wizard submission finished"
    );
    Ok(report)
}

async fn commit_occasion(
    collaborators: &Collaborators,
    user_id: &str,
    connection_id: &str,
    state: &WizardState,
    entry: &OccasionEntry,
    days: &[u32],
) -> Result<CommittedOccasion, AppError> {
    let event = collaborators
        .connections
        .create_or_update_event(
            user_id,
            &GiftEventInput {
                occasion_type: entry.occasion_type.clone(),
                event_date: entry.date,
                recurring: entry.recurring,
                label: entry.label.clone(),
            },
        )
        .await?;

    let rule_id = if state.auto_gifting_enabled {
        let rule = collaborators
            .connections
            .create_auto_gift_rule(
                user_id,
                &CreateAutoGiftRuleInput {
                    connection_id: connection_id.to_string(),
                    event_id: event.id.clone(),
                    budget_limit: state.budget_limit,
                    criteria: GiftCriteria {
                        categories: state.categories.clone(),
                        message: state.message_for(entry).map(str::to_string),
                    },
                    notification_prefs: RuleNotificationPrefs {
                        days_before: days.to_vec(),
                        email: true,
                    },
                    payment_method_id: state.payment_method_id.clone(),
                },
            )
            .await?;
        Some(rule.id)
    } else {
        None
    };

    Ok(CommittedOccasion {
        occasion_type: entry.occasion_type.clone(),
        event_id: event.id,
        rule_id,
    })
}
