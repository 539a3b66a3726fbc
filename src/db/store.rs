//! SQLite-backed implementations of the store traits.

use async_trait::async_trait;

use crate::db::models::{
    AutoGiftRule, Connection, CreateAutoGiftRuleInput, CreateConnectionInput, GiftEvent,
    GiftEventInput, PreferencesPatch, RecipientProfile, SavedSearch, UserPreferences,
};
use crate::db::repos::{
    auto_gift_rules, connections, gift_events, preferences, recipient_profiles, saved_searches,
};
use crate::db::DbPool;
use crate::engine::collaborators::{ConnectionStore, PreferenceStore};
use crate::engine::intake::{BudgetRange, RecipientDetails, SynthesizedQuery};
use crate::error::AppError;

#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl PreferenceStore for SqliteStore {
    async fn save_recipient_profile(
        &self,
        user_id: &str,
        details: &RecipientDetails,
    ) -> Result<RecipientProfile, AppError> {
        recipient_profiles::save(&self.pool, user_id, details)
    }

    async fn save_search(
        &self,
        user_id: &str,
        search: &SynthesizedQuery,
        occasion: Option<&str>,
        budget: Option<BudgetRange>,
    ) -> Result<SavedSearch, AppError> {
        saved_searches::create(&self.pool, user_id, search, occasion, budget)
    }

    async fn update_preferences(
        &self,
        user_id: &str,
        patch: PreferencesPatch,
    ) -> Result<UserPreferences, AppError> {
        preferences::update(&self.pool, user_id, patch)
    }
}

#[async_trait]
impl ConnectionStore for SqliteStore {
    async fn create_pending_connection(
        &self,
        user_id: &str,
        input: &CreateConnectionInput,
    ) -> Result<Connection, AppError> {
        connections::create_pending(&self.pool, user_id, input)
    }

    async fn create_or_update_event(
        &self,
        user_id: &str,
        input: &GiftEventInput,
    ) -> Result<GiftEvent, AppError> {
        gift_events::upsert(&self.pool, user_id, input)
    }

    async fn create_auto_gift_rule(
        &self,
        user_id: &str,
        input: &CreateAutoGiftRuleInput,
    ) -> Result<AutoGiftRule, AppError> {
        auto_gift_rules::create(&self.pool, user_id, input)
    }
}
