use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::engine::intake::IntakeState;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WizardRecipient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub relationship: String,
    /// Set when the recipient is already a connection (accepted or pending).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
}

/// One date to gift on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OccasionEntry {
    pub occasion_type: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Card message for this occasion; falls back to the shared message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Everything collected by the auto-gift wizard so far.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub recipient: WizardRecipient,
    pub address: Option<ShippingAddress>,
    pub occasions: Vec<OccasionEntry>,
    pub auto_gifting_enabled: bool,
    pub scheduled_gifting_enabled: bool,
    pub budget_limit: Option<f64>,
    pub categories: Vec<String>,
    pub shared_message: Option<String>,
    /// Reminder lead-times in days; empty means "use the configured default".
    pub notification_days: Vec<u32>,
    pub payment_method_id: Option<String>,
}

impl WizardState {
    /// Seed a wizard from a finished advisor conversation.
    ///
    /// The conversation carries no dates, so no occasion entries are seeded.
    pub fn seeded_from(intake: &IntakeState) -> Self {
        let mut recipient = WizardRecipient::default();
        let mut categories = Vec::new();

        if let Some(friend) = &intake.selected_friend {
            recipient.name = friend.name.clone();
            recipient.relationship = friend.relationship.clone().unwrap_or_default();
            recipient.connection_id = Some(friend.id.clone());
            categories = friend.interests.clone();
        } else if let Some(details) = &intake.recipient_details {
            recipient.name = details.name.clone();
            recipient.relationship = details.relationship.clone();
            categories = details.interests.clone();
        }

        if intake.selected_friend.is_none() {
            if let Some(invited) = &intake.invited_friend {
                recipient.name = invited.name.clone();
                recipient.email = Some(invited.email.clone());
                recipient.relationship = invited.relationship.clone();
                recipient.connection_id = Some(invited.connection_id.clone());
            }
        }

        Self {
            recipient,
            categories,
            budget_limit: intake.budget.map(|b| b.max),
            auto_gifting_enabled: true,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, patch: WizardPatch) {
        let WizardPatch {
            recipient,
            address,
            occasions,
            auto_gifting_enabled,
            scheduled_gifting_enabled,
            budget_limit,
            categories,
            shared_message,
            notification_days,
            payment_method_id,
        } = patch;

        if let Some(v) = recipient {
            self.recipient = v;
        }
        if let Some(v) = address {
            self.address = Some(v);
        }
        if let Some(v) = occasions {
            self.occasions = v;
        }
        if let Some(v) = auto_gifting_enabled {
            self.auto_gifting_enabled = v;
        }
        if let Some(v) = scheduled_gifting_enabled {
            self.scheduled_gifting_enabled = v;
        }
        if let Some(v) = budget_limit {
            self.budget_limit = Some(v);
        }
        if let Some(v) = categories {
            self.categories = v;
        }
        if let Some(v) = shared_message {
            self.shared_message = Some(v);
        }
        if let Some(v) = notification_days {
            self.notification_days = v;
        }
        if let Some(v) = payment_method_id {
            self.payment_method_id = Some(v);
        }
    }

    pub fn message_for<'a>(&'a self, entry: &'a OccasionEntry) -> Option<&'a str> {
        entry.message.as_deref().or(self.shared_message.as_deref())
    }
}

/// Partial update from one wizard step. `None` leaves the field alone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct WizardPatch {
    pub recipient: Option<WizardRecipient>,
    pub address: Option<ShippingAddress>,
    pub occasions: Option<Vec<OccasionEntry>>,
    pub auto_gifting_enabled: Option<bool>,
    pub scheduled_gifting_enabled: Option<bool>,
    pub budget_limit: Option<f64>,
    pub categories: Option<Vec<String>>,
    pub shared_message: Option<String>,
    pub notification_days: Option<Vec<u32>>,
    pub payment_method_id: Option<String>,
}
