use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ============================================================================
// Recipient Profiles
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecipientProfile {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub age_range: Option<String>,
    pub gender: Option<String>,
    pub relationship: String,
    pub interests: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

// ============================================================================
// Saved Searches
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SavedSearch {
    pub id: String,
    pub user_id: String,
    pub query: String,
    /// JSON-encoded `SearchContext`
    pub context: String,
    pub occasion: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub created_at: String,
}

// ============================================================================
// User Preferences
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserPreferences {
    pub user_id: String,
    pub last_recipient_id: Option<String>,
    pub preferred_occasion: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreferencesPatch {
    pub last_recipient_id: Option<String>,
    pub preferred_occasion: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
}

// ============================================================================
// Connections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Connection {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub relationship: String,
    /// "pending" until the invitee accepts, then "accepted"
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateConnectionInput {
    pub name: String,
    pub email: Option<String>,
    pub relationship: String,
}

// ============================================================================
// Gift Events (calendar)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GiftEvent {
    pub id: String,
    pub user_id: String,
    pub occasion_type: String,
    /// ISO 8601 date (YYYY-MM-DD)
    pub event_date: String,
    pub recurring: bool,
    pub label: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Upsert payload; events are keyed by `(user_id, occasion_type)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GiftEventInput {
    pub occasion_type: String,
    pub event_date: chrono::NaiveDate,
    pub recurring: bool,
    pub label: Option<String>,
}

// ============================================================================
// Auto-Gift Rules
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GiftCriteria {
    pub categories: Vec<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RuleNotificationPrefs {
    pub days_before: Vec<u32>,
    pub email: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AutoGiftRule {
    pub id: String,
    pub user_id: String,
    pub connection_id: String,
    pub event_id: String,
    pub budget_limit: Option<f64>,
    pub criteria: GiftCriteria,
    pub notification_prefs: RuleNotificationPrefs,
    pub payment_method_id: Option<String>,
    pub enabled: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateAutoGiftRuleInput {
    pub connection_id: String,
    pub event_id: String,
    pub budget_limit: Option<f64>,
    pub criteria: GiftCriteria,
    pub notification_prefs: RuleNotificationPrefs,
    pub payment_method_id: Option<String>,
}
