use rusqlite::{params, Row};

use crate::db::models::{GiftEvent, GiftEventInput};
use crate::db::{now_rfc3339, DbPool};
use crate::error::AppError;
use crate::validation;

fn row_to_event(row: &Row) -> rusqlite::Result<GiftEvent> {
    Ok(GiftEvent {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        occasion_type: row.get("occasion_type")?,
        event_date: row.get("event_date")?,
        recurring: row.get::<_, i32>("recurring")? != 0,
        label: row.get("label")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn get_by_id(pool: &DbPool, id: &str) -> Result<GiftEvent, AppError> {
    let conn = pool.get()?;
    conn.query_row("SELECT * FROM gift_events WHERE id = ?1", params![id], row_to_event)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AppError::NotFound(format!("Gift event {id}")),
            other => AppError::Database(other),
        })
}

pub fn find_by_occasion(
    pool: &DbPool,
    user_id: &str,
    occasion_type: &str,
) -> Result<Option<GiftEvent>, AppError> {
    let conn = pool.get()?;
    let result = conn.query_row(
        "SELECT * FROM gift_events WHERE user_id = ?1 AND occasion_type = ?2",
        params![user_id, occasion_type],
        row_to_event,
    );
    match result {
        Ok(event) => Ok(Some(event)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(AppError::Database(e)),
    }
}

pub fn list_by_user(pool: &DbPool, user_id: &str) -> Result<Vec<GiftEvent>, AppError> {
    let conn = pool.get()?;
    let mut stmt =
        conn.prepare("SELECT * FROM gift_events WHERE user_id = ?1 ORDER BY event_date")?;
    let rows = stmt.query_map(params![user_id], row_to_event)?;
    Ok(rows.filter_map(|r| r.ok()).collect())
}

/// Look up the event for `(user, occasion_type)` and update it, or create it.
pub fn upsert(pool: &DbPool, user_id: &str, input: &GiftEventInput) -> Result<GiftEvent, AppError> {
    validation::require_non_empty("occasion type", &input.occasion_type)?;

    let date = input.event_date.format("%Y-%m-%d").to_string();
    let now = now_rfc3339();

    let id = match find_by_occasion(pool, user_id, &input.occasion_type)? {
        Some(existing) => {
            let conn = pool.get()?;
            conn.execute(
                "UPDATE gift_events SET event_date = ?2, recurring = ?3, label = ?4, updated_at = ?5
                 WHERE id = ?1",
                params![existing.id, date, input.recurring as i32, input.label, now],
            )?;
            tracing::debug!(event_id = %existing.id, occasion = %input.occasion_type, "Updated gift event");
            existing.id
        }
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO gift_events
                 (id, user_id, occasion_type, event_date, recurring, label, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                params![
                    id, user_id, input.occasion_type, date,
                    input.recurring as i32, input.label, now,
                ],
            )?;
            tracing::debug!(event_id = %id, occasion = %input.occasion_type, "Created gift event");
            id
        }
    };

    get_by_id(pool, &id)
}
