use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::step::IntakeStep;
use super::synthesis::SearchContext;
use crate::error::AppError;
use crate::validation;

/// A friend picked from the user's existing connections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FriendProfile {
    /// Connection id in the connection store.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Recipient typed in by hand on the manual-entry path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RecipientDetails {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub relationship: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl RecipientDetails {
    pub fn validate(&self) -> Result<(), AppError> {
        validation::require_non_empty("recipient name", &self.name)?;
        validation::require_non_empty("relationship", &self.relationship)
    }
}

/// Inclusive dollar range, `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

impl BudgetRange {
    pub fn new(min: f64, max: f64) -> Result<Self, AppError> {
        validation::require_budget_range(min, max)?;
        Ok(Self { min, max })
    }
}

/// Friend details collected on the invitation path before the invite exists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PendingFriendData {
    pub name: String,
    pub email: String,
    pub relationship: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_message: Option<String>,
}

impl PendingFriendData {
    pub fn validate(&self) -> Result<(), AppError> {
        validation::require_non_empty("friend name", &self.name)?;
        validation::require_non_empty("relationship", &self.relationship)?;
        if !self.email.contains('@') {
            return Err(AppError::Validation(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        Ok(())
    }
}

/// An invitation that has been recorded as a pending connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvitedFriend {
    pub connection_id: String,
    pub name: String,
    pub email: String,
    pub relationship: String,
}

/// The session record of one open advisor conversation.
///
/// Committed slots are only overwritten by a patch that names them; moving
/// back never clears anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct IntakeState {
    pub step: IntakeStep,
    pub selected_friend: Option<FriendProfile>,
    pub recipient_details: Option<RecipientDetails>,
    pub occasion: Option<String>,
    pub budget: Option<BudgetRange>,
    pub search_query: Option<String>,
    pub search_context: Option<SearchContext>,
    pub is_authenticated: bool,
    /// What the user was doing when the auth gate interrupted the flow.
    pub pending_action: Option<IntakeStep>,
    pub invited_friend: Option<InvitedFriend>,
    pub pending_friend_data: Option<PendingFriendData>,
}

impl Default for IntakeState {
    fn default() -> Self {
        Self {
            step: IntakeStep::Welcome,
            selected_friend: None,
            recipient_details: None,
            occasion: None,
            budget: None,
            search_query: None,
            search_context: None,
            is_authenticated: false,
            pending_action: None,
            invited_friend: None,
            pending_friend_data: None,
        }
    }
}

impl IntakeState {
    pub fn has_recipient(&self) -> bool {
        self.selected_friend.is_some() || self.recipient_details.is_some()
    }

    /// Display name of whichever recipient source wins.
    pub fn recipient_name(&self) -> Option<&str> {
        self.selected_friend
            .as_ref()
            .map(|f| f.name.as_str())
            .or_else(|| self.recipient_details.as_ref().map(|d| d.name.as_str()))
    }

    /// Merge `patch` in; keys present in the patch win, absent keys keep their value.
    pub fn apply(&mut self, patch: IntakePatch) {
        let IntakePatch {
            selected_friend,
            recipient_details,
            occasion,
            budget,
            search_query,
            search_context,
            pending_action,
            invited_friend,
            pending_friend_data,
        } = patch;

        if let Some(v) = selected_friend {
            self.selected_friend = Some(v);
        }
        if let Some(v) = recipient_details {
            self.recipient_details = Some(v);
        }
        if let Some(v) = occasion {
            self.occasion = Some(v);
        }
        if let Some(v) = budget {
            self.budget = Some(v);
        }
        if let Some(v) = search_query {
            self.search_query = Some(v);
        }
        if let Some(v) = search_context {
            self.search_context = Some(v);
        }
        if let Some(v) = pending_action {
            self.pending_action = Some(v);
        }
        if let Some(v) = invited_friend {
            self.invited_friend = Some(v);
        }
        if let Some(v) = pending_friend_data {
            self.pending_friend_data = Some(v);
        }
    }
}

/// Partial update to an [`IntakeState`]. `None` means "leave as is".
///
/// `step` and `is_authenticated` are deliberately absent: the machine owns both.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakePatch {
    pub selected_friend: Option<FriendProfile>,
    pub recipient_details: Option<RecipientDetails>,
    pub occasion: Option<String>,
    pub budget: Option<BudgetRange>,
    pub search_query: Option<String>,
    pub search_context: Option<SearchContext>,
    pub pending_action: Option<IntakeStep>,
    pub invited_friend: Option<InvitedFriend>,
    pub pending_friend_data: Option<PendingFriendData>,
}

impl IntakePatch {
    pub fn friend(friend: FriendProfile) -> Self {
        Self {
            selected_friend: Some(friend),
            ..Self::default()
        }
    }

    pub fn details(details: RecipientDetails) -> Self {
        Self {
            recipient_details: Some(details),
            ..Self::default()
        }
    }

    pub fn occasion(occasion: impl Into<String>) -> Self {
        Self {
            occasion: Some(occasion.into()),
            ..Self::default()
        }
    }

    pub fn budget(budget: BudgetRange) -> Self {
        Self {
            budget: Some(budget),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
