use rusqlite::{params, Row};

use crate::db::models::SavedSearch;
use crate::db::{now_rfc3339, DbPool};
use crate::engine::intake::{BudgetRange, SynthesizedQuery};
use crate::error::AppError;

fn row_to_search(row: &Row) -> rusqlite::Result<SavedSearch> {
    Ok(SavedSearch {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        query: row.get("query")?,
        context: row.get("context")?,
        occasion: row.get("occasion")?,
        budget_min: row.get("budget_min")?,
        budget_max: row.get("budget_max")?,
        created_at: row.get("created_at")?,
    })
}

pub fn get_by_id(pool: &DbPool, id: &str) -> Result<SavedSearch, AppError> {
    let conn = pool.get()?;
    conn.query_row("SELECT * FROM saved_searches WHERE id = ?1", params![id], row_to_search)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AppError::NotFound(format!("Saved search {id}")),
            other => AppError::Database(other),
        })
}

/// Most recent searches first.
pub fn list_recent(pool: &DbPool, user_id: &str, limit: u32) -> Result<Vec<SavedSearch>, AppError> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT * FROM saved_searches WHERE user_id = ?1 ORDER BY created_at DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![user_id, limit], row_to_search)?;
    Ok(rows.filter_map(|r| r.ok()).collect())
}

pub fn create(
    pool: &DbPool,
    user_id: &str,
    search: &SynthesizedQuery,
    occasion: Option<&str>,
    budget: Option<BudgetRange>,
) -> Result<SavedSearch, AppError> {
    let id = uuid::Uuid::new_v4().to_string();
    let context = serde_json::to_string(&search.context)?;
    let now = now_rfc3339();

    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO saved_searches
         (id, user_id, query, context, occasion, budget_min, budget_max, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            user_id,
            search.query,
            context,
            occasion,
            budget.map(|b| b.min),
            budget.map(|b| b.max),
            now,
        ],
    )?;
    drop(conn);

    get_by_id(pool, &id)
}
