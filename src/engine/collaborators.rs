//! Interfaces to everything the state machines do not own.
//!
//! Auth, storage and notifications are injected as trait objects so the
//! machines hold no ambient globals and tests can swap in fakes.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::db::models::{
    AutoGiftRule, Connection, CreateAutoGiftRuleInput, CreateConnectionInput, GiftEvent,
    GiftEventInput, PreferencesPatch, RecipientProfile, SavedSearch, UserPreferences,
};
use crate::engine::intake::{BudgetRange, RecipientDetails, SynthesizedQuery};
use crate::error::AppError;
use crate::notifications::NotificationSink;

// ── Auth ───────────────────────────────────────────────────────────

/// Read-only view of the host's authentication state.
pub trait AuthOracle: Send + Sync {
    fn is_authenticated(&self) -> bool;

    fn current_user_id(&self) -> Option<String>;
}

/// Auth state the host updates on sign-in and sign-out.
#[derive(Debug, Default)]
pub struct SessionAuth {
    user_id: RwLock<Option<String>>,
}

impl SessionAuth {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: RwLock::new(Some(user_id.into())),
        }
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        if let Ok(mut guard) = self.user_id.write() {
            *guard = Some(user_id.into());
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut guard) = self.user_id.write() {
            *guard = None;
        }
    }
}

impl AuthOracle for SessionAuth {
    fn is_authenticated(&self) -> bool {
        self.current_user_id().is_some()
    }

    fn current_user_id(&self) -> Option<String> {
        self.user_id.read().ok().and_then(|guard| guard.clone())
    }
}

// ── Stores ─────────────────────────────────────────────────────────

/// Profile and preference persistence used by the intake machine.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn save_recipient_profile(
        &self,
        user_id: &str,
        details: &RecipientDetails,
    ) -> Result<RecipientProfile, AppError>;

    async fn save_search(
        &self,
        user_id: &str,
        search: &SynthesizedQuery,
        occasion: Option<&str>,
        budget: Option<BudgetRange>,
    ) -> Result<SavedSearch, AppError>;

    async fn update_preferences(
        &self,
        user_id: &str,
        patch: PreferencesPatch,
    ) -> Result<UserPreferences, AppError>;
}

/// Connections, calendar events and auto-gift rules.
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    async fn create_pending_connection(
        &self,
        user_id: &str,
        input: &CreateConnectionInput,
    ) -> Result<Connection, AppError>;

    /// Look up the event keyed by `(user, occasion_type)` or create it.
    async fn create_or_update_event(
        &self,
        user_id: &str,
        input: &GiftEventInput,
    ) -> Result<GiftEvent, AppError>;

    async fn create_auto_gift_rule(
        &self,
        user_id: &str,
        input: &CreateAutoGiftRuleInput,
    ) -> Result<AutoGiftRule, AppError>;
}

/// Everything a machine needs from the outside world.
#[derive(Clone)]
pub struct Collaborators {
    pub auth: Arc<dyn AuthOracle>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub connections: Arc<dyn ConnectionStore>,
    pub notifier: Arc<dyn NotificationSink>,
}
