use rusqlite::{params, Row};

use crate::db::models::{PreferencesPatch, UserPreferences};
use crate::db::{now_rfc3339, DbPool};
use crate::error::AppError;
use crate::validation;

fn row_to_preferences(row: &Row) -> rusqlite::Result<UserPreferences> {
    Ok(UserPreferences {
        user_id: row.get("user_id")?,
        last_recipient_id: row.get("last_recipient_id")?,
        preferred_occasion: row.get("preferred_occasion")?,
        budget_min: row.get("budget_min")?,
        budget_max: row.get("budget_max")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Get a user's preferences. Returns None if none were ever saved.
pub fn get(pool: &DbPool, user_id: &str) -> Result<Option<UserPreferences>, AppError> {
    let conn = pool.get()?;
    let result = conn.query_row(
        "SELECT * FROM user_preferences WHERE user_id = ?1",
        params![user_id],
        row_to_preferences,
    );

    match result {
        Ok(prefs) => Ok(Some(prefs)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(AppError::Database(e)),
    }
}

/// Merge `patch` into the user's preferences, creating the row on first use.
pub fn update(
    pool: &DbPool,
    user_id: &str,
    patch: PreferencesPatch,
) -> Result<UserPreferences, AppError> {
    validation::require_valid_id("user_id", user_id)?;
    if let (Some(min), Some(max)) = (patch.budget_min, patch.budget_max) {
        validation::require_budget_range(min, max)?;
    }

    let now = now_rfc3339();
    let conn = pool.get()?;
    conn.execute(
        "INSERT OR IGNORE INTO user_preferences (user_id, updated_at) VALUES (?1, ?2)",
        params![user_id, now],
    )?;

    // Build dynamic SET clause
    let mut sets: Vec<String> = Vec::new();
    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    push_set!(Some(now), "updated_at", sets, param_values);
    push_set!(patch.last_recipient_id, "last_recipient_id", sets, param_values);
    push_set!(patch.preferred_occasion, "preferred_occasion", sets, param_values);
    push_set!(patch.budget_min, "budget_min", sets, param_values);
    push_set!(patch.budget_max, "budget_max", sets, param_values);

    param_values.push(Box::new(user_id.to_string()));
    let sql = format!(
        "UPDATE user_preferences SET {} WHERE user_id = ?{}",
        sets.join(", "),
        param_values.len()
    );

    let params_ref: Vec<&dyn rusqlite::types::ToSql> =
        param_values.iter().map(|p| p.as_ref()).collect();
    conn.execute(&sql, params_ref.as_slice())?;
    drop(conn);

    get(pool, user_id)?.ok_or_else(|| AppError::NotFound(format!("Preferences for {user_id}")))
}
