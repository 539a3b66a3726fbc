use rusqlite::Connection;

use crate::error::AppError;

/// Run the schema migration. Idempotent; safe on every startup.
pub fn run(conn: &Connection) -> Result<(), AppError> {
    tracing::debug!("Running database migrations");

    conn.execute_batch(SCHEMA)?;

    tracing::info!("Database migrations complete");
    Ok(())
}

const SCHEMA: &str = r#"

-- ============================================================================
-- Recipient Profiles (manual-entry recipients)
-- ============================================================================

CREATE TABLE IF NOT EXISTS recipient_profiles (
    id              TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL,
    name            TEXT NOT NULL,
    age_range       TEXT,
    gender          TEXT,
    relationship    TEXT NOT NULL,
    interests       TEXT NOT NULL DEFAULT '[]',
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_recipient_profiles_user ON recipient_profiles(user_id);

-- ============================================================================
-- Saved Searches
-- ============================================================================

CREATE TABLE IF NOT EXISTS saved_searches (
    id              TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL,
    query           TEXT NOT NULL,
    context         TEXT NOT NULL,
    occasion        TEXT,
    budget_min      REAL,
    budget_max      REAL,
    created_at      TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_saved_searches_user ON saved_searches(user_id, created_at);

-- ============================================================================
-- User Preferences
-- ============================================================================

CREATE TABLE IF NOT EXISTS user_preferences (
    user_id             TEXT PRIMARY KEY,
    last_recipient_id   TEXT,
    preferred_occasion  TEXT,
    budget_min          REAL,
    budget_max          REAL,
    updated_at          TEXT NOT NULL
);

-- ============================================================================
-- Connections
-- ============================================================================

CREATE TABLE IF NOT EXISTS connections (
    id              TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL,
    name            TEXT NOT NULL,
    email           TEXT,
    relationship    TEXT NOT NULL,
    status          TEXT NOT NULL DEFAULT 'pending',
    created_at      TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_connections_user ON connections(user_id);

-- ============================================================================
-- Gift Events
-- ============================================================================

CREATE TABLE IF NOT EXISTS gift_events (
    id              TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL,
    occasion_type   TEXT NOT NULL,
    event_date      TEXT NOT NULL,
    recurring       INTEGER NOT NULL DEFAULT 1,
    label           TEXT,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL,
    UNIQUE(user_id, occasion_type)
);

-- ============================================================================
-- Auto-Gift Rules
-- ============================================================================

CREATE TABLE IF NOT EXISTS auto_gift_rules (
    id                  TEXT PRIMARY KEY,
    user_id             TEXT NOT NULL,
    connection_id       TEXT NOT NULL REFERENCES connections(id) ON DELETE CASCADE,
    event_id            TEXT NOT NULL REFERENCES gift_events(id) ON DELETE CASCADE,
    budget_limit        REAL,
    criteria            TEXT NOT NULL DEFAULT '{}',
    notification_prefs  TEXT NOT NULL DEFAULT '{}',
    payment_method_id   TEXT,
    enabled             INTEGER NOT NULL DEFAULT 1,
    created_at          TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_auto_gift_rules_user  ON auto_gift_rules(user_id);
CREATE INDEX IF NOT EXISTS idx_auto_gift_rules_event ON auto_gift_rules(event_id);
"#;
