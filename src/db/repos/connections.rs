use rusqlite::{params, Row};

use crate::db::models::{Connection, CreateConnectionInput};
use crate::db::{now_rfc3339, DbPool};
use crate::error::AppError;
use crate::validation;

fn row_to_connection(row: &Row) -> rusqlite::Result<Connection> {
    Ok(Connection {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        relationship: row.get("relationship")?,
        status: row.get("status")?,
        created_at: row.get("created_at")?,
    })
}

pub fn get_by_id(pool: &DbPool, id: &str) -> Result<Connection, AppError> {
    let conn = pool.get()?;
    conn.query_row("SELECT * FROM connections WHERE id = ?1", params![id], row_to_connection)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AppError::NotFound(format!("Connection {id}")),
            other => AppError::Database(other),
        })
}

pub fn list_by_user(pool: &DbPool, user_id: &str) -> Result<Vec<Connection>, AppError> {
    let conn = pool.get()?;
    let mut stmt =
        conn.prepare("SELECT * FROM connections WHERE user_id = ?1 ORDER BY name")?;
    let rows = stmt.query_map(params![user_id], row_to_connection)?;
    Ok(rows.filter_map(|r| r.ok()).collect())
}

/// Record an invitation as a pending connection.
pub fn create_pending(
    pool: &DbPool,
    user_id: &str,
    input: &CreateConnectionInput,
) -> Result<Connection, AppError> {
    validation::require_non_empty("connection name", &input.name)?;
    validation::require_non_empty("relationship", &input.relationship)?;

    let id = uuid::Uuid::new_v4().to_string();
    let now = now_rfc3339();

    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO connections (id, user_id, name, email, relationship, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6)",
        params![id, user_id, input.name, input.email, input.relationship, now],
    )?;
    drop(conn);

    get_by_id(pool, &id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_test_db;

    #[test]
    fn test_create_pending() {
        let pool = init_test_db().unwrap();
        let created = create_pending(
            &pool,
            "user-1",
            &CreateConnectionInput {
                name: "Jo".into(),
                email: Some("jo@example.com".into()),
                relationship: "cousin".into(),
            },
        )
        .unwrap();
        assert_eq!(created.status, "pending");
        assert_eq!(list_by_user(&pool, "user-1").unwrap(), vec![created]);
    }

    #[test]
    fn test_create_pending_requires_name() {
        let pool = init_test_db().unwrap();
        let err = create_pending(
            &pool,
            "user-1",
            &CreateConnectionInput {
                name: String::new(),
                email: None,
                relationship: "friend".into(),
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), "validation");
    }
}
