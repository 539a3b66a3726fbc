//! Gifting advisor core.
//!
//! Two session state machines behind a host UI: the guided intake
//! conversation ([`engine::intake::IntakeMachine`]) and the auto-gift setup
//! wizard ([`engine::wizard::WizardStepper`]). Storage, auth and user-visible
//! notifications are reached through [`engine::collaborators`]; a SQLite
//! implementation of the stores ships in [`db`].

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod logging;
pub mod notifications;
pub mod validation;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use config::AdvisorConfig;
pub use engine::collaborators::{Collaborators, SessionAuth};
pub use engine::intake::{IntakeMachine, IntakeState, IntakeStep, TransitionOutcome};
pub use engine::wizard::{WizardState, WizardStepper};
pub use error::AppError;

use db::{DbPool, SqliteStore};
use notifications::{NotificationSink, TracingSink};

const APP_DIR: &str = "gift-advisor";
const CONFIG_FILE: &str = "advisor.toml";

/// Process-wide state shared by every open conversation and wizard.
pub struct AppState {
    pub db: DbPool,
    pub config: AdvisorConfig,
    pub store: SqliteStore,
    /// Host updates this on sign-in and sign-out.
    pub auth: Arc<SessionAuth>,
    pub notifier: Arc<dyn NotificationSink>,
}

impl AppState {
    pub fn collaborators(&self) -> Collaborators {
        let store = Arc::new(self.store.clone());
        Collaborators {
            auth: self.auth.clone(),
            preferences: store.clone(),
            connections: store,
            notifier: Arc::clone(&self.notifier),
        }
    }

    /// Open a new advisor conversation.
    pub fn open_intake(&self) -> IntakeMachine {
        IntakeMachine::new(self.collaborators(), &self.config)
    }

    pub fn open_wizard(&self, seed: Option<WizardState>) -> WizardStepper {
        WizardStepper::with_state(self.collaborators(), &self.config, seed.unwrap_or_default())
    }

    /// Swap the notification sink, e.g. for one that forwards to the UI.
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }
}

/// Default data directory: `<platform data dir>/gift-advisor`.
pub fn default_data_dir() -> Result<PathBuf, AppError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| AppError::Internal("No platform data directory".into()))
}

/// Load config, start logging and open the database.
///
/// `data_dir` defaults to [`default_data_dir`]; the config file is
/// `advisor.toml` inside it unless `config_path` says otherwise.
pub fn bootstrap(data_dir: Option<&Path>, config_path: Option<&Path>) -> Result<AppState, AppError> {
    let data_dir = match data_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_data_dir()?,
    };
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| data_dir.join(CONFIG_FILE));

    let config = AdvisorConfig::load(Some(&config_path))?;
    logging::init(config.log_filter.as_deref());

    tracing::info!("Starting gift advisor v{}", env!("CARGO_PKG_VERSION"));

    let pool = db::init_db(&data_dir, &config.database_file)?;
    Ok(AppState {
        store: SqliteStore::new(pool.clone()),
        db: pool,
        config,
        auth: Arc::new(SessionAuth::default()),
        notifier: Arc::new(TracingSink),
    })
}
