#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use gift_advisor::db::models::{
    AutoGiftRule, Connection, CreateAutoGiftRuleInput, CreateConnectionInput, GiftEvent,
    GiftEventInput, PreferencesPatch, RecipientProfile, SavedSearch, UserPreferences,
};
use gift_advisor::engine::collaborators::{ConnectionStore, PreferenceStore};
use gift_advisor::engine::intake::{BudgetRange, RecipientDetails, SynthesizedQuery};
use gift_advisor::notifications::QueueSink;
use gift_advisor::{AppError, Collaborators, SessionAuth};

const STAMP: &str = "2026-01-01T00:00:00Z";

/// In-memory stores. Event creation for `failing_occasion` always errors.
#[derive(Default)]
pub struct MemoryStore {
    pub failing_occasion: Option<String>,
    pub searches: Mutex<Vec<SavedSearch>>,
    pub preferences: Mutex<Vec<PreferencesPatch>>,
    pub connections: Mutex<Vec<Connection>>,
    pub events: Mutex<Vec<GiftEvent>>,
    pub rules: Mutex<Vec<AutoGiftRule>>,
}

impl MemoryStore {
    pub fn failing_on(occasion: &str) -> Self {
        Self {
            failing_occasion: Some(occasion.to_string()),
            ..Self::default()
        }
    }

    pub fn event_types(&self) -> Vec<String> {
        self.events.lock().unwrap().iter().map(|e| e.occasion_type.clone()).collect()
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn save_recipient_profile(
        &self,
        user_id: &str,
        details: &RecipientDetails,
    ) -> Result<RecipientProfile, AppError> {
        Ok(RecipientProfile {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            name: details.name.clone(),
            age_range: details.age_range.clone(),
            gender: details.gender.clone(),
            relationship: details.relationship.clone(),
            interests: details.interests.clone(),
            created_at: STAMP.into(),
            updated_at: STAMP.into(),
        })
    }

    async fn save_search(
        &self,
        user_id: &str,
        search: &SynthesizedQuery,
        occasion: Option<&str>,
        budget: Option<BudgetRange>,
    ) -> Result<SavedSearch, AppError> {
        let saved = SavedSearch {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            query: search.query.clone(),
            context: serde_json::to_string(&search.context)?,
            occasion: occasion.map(str::to_string),
            budget_min: budget.map(|b| b.min),
            budget_max: budget.map(|b| b.max),
            created_at: STAMP.into(),
        };
        self.searches.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn update_preferences(
        &self,
        user_id: &str,
        patch: PreferencesPatch,
    ) -> Result<UserPreferences, AppError> {
        self.preferences.lock().unwrap().push(patch.clone());
        Ok(UserPreferences {
            user_id: user_id.into(),
            last_recipient_id: patch.last_recipient_id,
            preferred_occasion: patch.preferred_occasion,
            budget_min: patch.budget_min,
            budget_max: patch.budget_max,
            updated_at: STAMP.into(),
        })
    }
}

#[async_trait]
impl ConnectionStore for MemoryStore {
    async fn create_pending_connection(
        &self,
        user_id: &str,
        input: &CreateConnectionInput,
    ) -> Result<Connection, AppError> {
        let connection = Connection {
            id: format!("conn-{}", input.name.to_lowercase()),
            user_id: user_id.into(),
            name: input.name.clone(),
            email: input.email.clone(),
            relationship: input.relationship.clone(),
            status: "pending".into(),
            created_at: STAMP.into(),
        };
        self.connections.lock().unwrap().push(connection.clone());
        Ok(connection)
    }

    async fn create_or_update_event(
        &self,
        user_id: &str,
        input: &GiftEventInput,
    ) -> Result<GiftEvent, AppError> {
        if self.failing_occasion.as_deref() == Some(input.occasion_type.as_str()) {
            return Err(AppError::Persistence(format!(
                "calendar rejected {}",
                input.occasion_type
            )));
        }
        let event = GiftEvent {
            id: format!("evt-{}", input.occasion_type),
            user_id: user_id.into(),
            occasion_type: input.occasion_type.clone(),
            event_date: input.event_date.format("%Y-%m-%d").to_string(),
            recurring: input.recurring,
            label: input.label.clone(),
            created_at: STAMP.into(),
            updated_at: STAMP.into(),
        };
        let mut events = self.events.lock().unwrap();
        events.retain(|e| e.occasion_type != event.occasion_type);
        events.push(event.clone());
        Ok(event)
    }

    async fn create_auto_gift_rule(
        &self,
        user_id: &str,
        input: &CreateAutoGiftRuleInput,
    ) -> Result<AutoGiftRule, AppError> {
        let rule = AutoGiftRule {
            id: format!("rule-{}", input.event_id),
            user_id: user_id.into(),
            connection_id: input.connection_id.clone(),
            event_id: input.event_id.clone(),
            budget_limit: input.budget_limit,
            criteria: input.criteria.clone(),
            notification_prefs: input.notification_prefs.clone(),
            payment_method_id: input.payment_method_id.clone(),
            enabled: true,
            created_at: STAMP.into(),
        };
        self.rules.lock().unwrap().push(rule.clone());
        Ok(rule)
    }
}

pub struct Fixture {
    pub auth: Arc<SessionAuth>,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<QueueSink>,
}

impl Fixture {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            auth: Arc::new(SessionAuth::default()),
            store: Arc::new(store),
            notifier: Arc::new(QueueSink::default()),
        }
    }

    pub fn signed_in(store: MemoryStore, user_id: &str) -> Self {
        let fixture = Self::new(store);
        fixture.auth.sign_in(user_id);
        fixture
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            auth: self.auth.clone(),
            preferences: self.store.clone(),
            connections: self.store.clone(),
            notifier: self.notifier.clone(),
        }
    }
}
