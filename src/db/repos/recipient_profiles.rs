use rusqlite::{params, Row};

use crate::db::models::RecipientProfile;
use crate::db::{json_column, now_rfc3339, DbPool};
use crate::engine::intake::RecipientDetails;
use crate::error::AppError;

fn row_to_profile(row: &Row) -> rusqlite::Result<RecipientProfile> {
    Ok(RecipientProfile {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        age_range: row.get("age_range")?,
        gender: row.get("gender")?,
        relationship: row.get("relationship")?,
        interests: json_column(row, "interests")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn get_by_id(pool: &DbPool, id: &str) -> Result<RecipientProfile, AppError> {
    let conn = pool.get()?;
    conn.query_row(
        "SELECT * FROM recipient_profiles WHERE id = ?1",
        params![id],
        row_to_profile,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::NotFound(format!("Recipient profile {id}")),
        other => AppError::Database(other),
    })
}

pub fn list_by_user(pool: &DbPool, user_id: &str) -> Result<Vec<RecipientProfile>, AppError> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT * FROM recipient_profiles WHERE user_id = ?1 ORDER BY updated_at DESC",
    )?;
    let rows = stmt.query_map(params![user_id], row_to_profile)?;
    Ok(rows.filter_map(|r| r.ok()).collect())
}

/// Save a manually entered recipient. A profile with the same name and
/// relationship for this user is updated in place rather than duplicated.
pub fn save(
    pool: &DbPool,
    user_id: &str,
    details: &RecipientDetails,
) -> Result<RecipientProfile, AppError> {
    details.validate()?;

    let interests = serde_json::to_string(&details.interests)?;
    let now = now_rfc3339();
    let conn = pool.get()?;

    let existing: Option<String> = match conn.query_row(
        "SELECT id FROM recipient_profiles WHERE user_id = ?1 AND name = ?2 AND relationship = ?3",
        params![user_id, details.name, details.relationship],
        |row| row.get(0),
    ) {
        Ok(id) => Some(id),
        Err(rusqlite::Error::QueryReturnedNoRows) => None,
        Err(e) => return Err(AppError::Database(e)),
    };

    let id = match existing {
        Some(id) => {
            conn.execute(
                "UPDATE recipient_profiles
                 SET age_range = ?2, gender = ?3, interests = ?4, updated_at = ?5
                 WHERE id = ?1",
                params![id, details.age_range, details.gender, interests, now],
            )?;
            id
        }
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            conn.execute(
                "INSERT INTO recipient_profiles
                 (id, user_id, name, age_range, gender, relationship, interests, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                params![
                    id, user_id, details.name, details.age_range, details.gender,
                    details.relationship, interests, now,
                ],
            )?;
            id
        }
    };
    drop(conn);

    get_by_id(pool, &id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_test_db;

    fn alex() -> RecipientDetails {
        RecipientDetails {
            name: "Alex".into(),
            age_range: Some("25-34".into()),
            gender: None,
            relationship: "sibling".into(),
            interests: vec!["coffee".into()],
        }
    }

    #[test]
    fn test_save_and_upsert() {
        let pool = init_test_db().unwrap();

        let first = save(&pool, "user-1", &alex()).unwrap();
        assert_eq!(first.interests, vec!["coffee"]);

        let mut changed = alex();
        changed.interests.push("vinyl".into());
        let second = save(&pool, "user-1", &changed).unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.interests, vec!["coffee", "vinyl"]);

        assert_eq!(list_by_user(&pool, "user-1").unwrap().len(), 1);
        assert!(list_by_user(&pool, "user-2").unwrap().is_empty());
    }

    #[test]
    fn test_save_rejects_blank_name() {
        let pool = init_test_db().unwrap();
        let mut details = alex();
        details.name = "  ".into();
        assert!(matches!(
            save(&pool, "user-1", &details),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let pool = init_test_db().unwrap();
        assert!(matches!(get_by_id(&pool, "nope"), Err(AppError::NotFound(_))));
    }
}
