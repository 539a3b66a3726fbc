//! Step list of the auto-gift wizard.
//!
//! The list is derived from the accumulated state on every call, never
//! stored, so flipping auto-gifting on or off reshapes the wizard even after
//! the user has passed the toggle.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::state::WizardState;
use crate::error::AppError;
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStepKind {
    Recipient,
    Occasions,
    Preferences,
    Payment,
    Review,
}

impl WizardStepKind {
    pub fn title(&self) -> &'static str {
        match self {
            WizardStepKind::Recipient => "Who is it for?",
            WizardStepKind::Occasions => "Which occasions?",
            WizardStepKind::Preferences => "Gift preferences",
            WizardStepKind::Payment => "Payment",
            WizardStepKind::Review => "Review",
        }
    }
}

/// Steps present whatever the toggles say.
pub const BASE_STEPS: [WizardStepKind; 4] = [
    WizardStepKind::Recipient,
    WizardStepKind::Occasions,
    WizardStepKind::Preferences,
    WizardStepKind::Review,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StepDescriptor {
    /// 1-based position.
    pub index: usize,
    pub kind: WizardStepKind,
}

/// Ordered steps for `state`. Payment sits right before review when
/// auto-gifting is on.
pub fn derive_steps(state: &WizardState) -> Vec<StepDescriptor> {
    let mut kinds = BASE_STEPS.to_vec();
    if state.auto_gifting_enabled {
        kinds.insert(kinds.len() - 1, WizardStepKind::Payment);
    }
    kinds
        .into_iter()
        .enumerate()
        .map(|(i, kind)| StepDescriptor { index: i + 1, kind })
        .collect()
}

pub fn total_steps(state: &WizardState) -> usize {
    BASE_STEPS.len() + usize::from(state.auto_gifting_enabled)
}

/// Check that `state` satisfies what `kind` collects before moving past it.
pub fn validate_step(kind: WizardStepKind, state: &WizardState) -> Result<(), AppError> {
    match kind {
        WizardStepKind::Recipient => {
            validation::require_non_empty("recipient name", &state.recipient.name)?;
            validation::require_non_empty("relationship", &state.recipient.relationship)?;
            match &state.recipient.email {
                Some(email) if !email.contains('@') => Err(AppError::Validation(format!(
                    "'{email}' is not a valid email address"
                ))),
                _ => Ok(()),
            }
        }
        WizardStepKind::Occasions => {
            if state.occasions.is_empty() {
                return Err(AppError::Validation("Add at least one occasion".into()));
            }
            for entry in &state.occasions {
                validation::require_non_empty("occasion type", &entry.occasion_type)?;
            }
            Ok(())
        }
        WizardStepKind::Preferences => {
            if let Some(limit) = state.budget_limit {
                validation::require_amount("budget limit", limit)?;
            }
            validation::require_notification_days(&state.notification_days)
        }
        WizardStepKind::Payment => match state.payment_method_id.as_deref() {
            Some(id) if !id.trim().is_empty() => Ok(()),
            _ => Err(AppError::Validation(
                "Choose a payment method for auto-gifting".into(),
            )),
        },
        WizardStepKind::Review => Ok(()),
    }
}
