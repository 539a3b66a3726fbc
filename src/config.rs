//! Runtime configuration.
//!
//! Values come from an optional TOML file, then environment overrides
//! (a `.env` file is honoured via `dotenvy`). Every field has a default so an
//! empty file and no env still yields a usable config.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::validation;

pub const ENV_GENERATION_DELAY_MS: &str = "GIFT_ADVISOR_GENERATION_DELAY_MS";
pub const ENV_DATABASE_FILE: &str = "GIFT_ADVISOR_DATABASE_FILE";
pub const ENV_LOG: &str = "GIFT_ADVISOR_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Pause before the query is synthesized, so the "generating" view is
    /// visible. Pacing only; never a retry interval.
    pub generation_delay_ms: u64,
    /// SQLite file name inside the data directory.
    pub database_file: String,
    /// Reminder lead-times used when the wizard collected none.
    pub default_notification_days: Vec<u32>,
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            generation_delay_ms: 1500,
            database_file: "gifting.db".into(),
            default_notification_days: vec![7, 3, 1],
            log_filter: None,
        }
    }
}

impl AdvisorConfig {
    /// Load from `path` (when given and present), apply env overrides, validate.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let mut config = match path {
            Some(p) if p.exists() => {
                let raw = std::fs::read_to_string(p)?;
                tracing::debug!(path = %p.display(), "Loading advisor config");
                Self::from_toml_str(&raw)?
            }
            Some(p) => {
                tracing::debug!(path = %p.display(), "Config file absent, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, AppError> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply overrides from an env-like lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_GENERATION_DELAY_MS) {
            self.generation_delay_ms = raw.trim().parse().map_err(|_| {
                AppError::Validation(format!("{ENV_GENERATION_DELAY_MS} must be an integer, got '{raw}'"))
            })?;
        }
        if let Some(file) = lookup(ENV_DATABASE_FILE) {
            self.database_file = file;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = Some(filter);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validation::require_non_empty("database_file", &self.database_file)?;
        validation::require_notification_days(&self.default_notification_days)
    }

    pub fn generation_delay(&self) -> Duration {
        Duration::from_millis(self.generation_delay_ms)
    }
}
