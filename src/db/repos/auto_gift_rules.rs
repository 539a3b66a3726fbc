use rusqlite::{params, Row};

use crate::db::models::{AutoGiftRule, CreateAutoGiftRuleInput};
use crate::db::{json_column, now_rfc3339, DbPool};
use crate::error::AppError;
use crate::validation;

fn row_to_rule(row: &Row) -> rusqlite::Result<AutoGiftRule> {
    Ok(AutoGiftRule {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        connection_id: row.get("connection_id")?,
        event_id: row.get("event_id")?,
        budget_limit: row.get("budget_limit")?,
        criteria: json_column(row, "criteria")?,
        notification_prefs: json_column(row, "notification_prefs")?,
        payment_method_id: row.get("payment_method_id")?,
        enabled: row.get::<_, i32>("enabled")? != 0,
        created_at: row.get("created_at")?,
    })
}

pub fn get_by_id(pool: &DbPool, id: &str) -> Result<AutoGiftRule, AppError> {
    let conn = pool.get()?;
    conn.query_row("SELECT * FROM auto_gift_rules WHERE id = ?1", params![id], row_to_rule)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AppError::NotFound(format!("Auto-gift rule {id}")),
            other => AppError::Database(other),
        })
}

pub fn list_by_user(pool: &DbPool, user_id: &str) -> Result<Vec<AutoGiftRule>, AppError> {
    let conn = pool.get()?;
    let mut stmt =
        conn.prepare("SELECT * FROM auto_gift_rules WHERE user_id = ?1 ORDER BY created_at")?;
    let rows = stmt.query_map(params![user_id], row_to_rule)?;
    Ok(rows.filter_map(|r| r.ok()).collect())
}

pub fn create(
    pool: &DbPool,
    user_id: &str,
    input: &CreateAutoGiftRuleInput,
) -> Result<AutoGiftRule, AppError> {
    validation::require_valid_id("connection_id", &input.connection_id)?;
    validation::require_valid_id("event_id", &input.event_id)?;
    if let Some(limit) = input.budget_limit {
        validation::require_amount("budget_limit", limit)?;
    }

    let id = uuid::Uuid::new_v4().to_string();
    let criteria = serde_json::to_string(&input.criteria)?;
    let notification_prefs = serde_json::to_string(&input.notification_prefs)?;
    let now = now_rfc3339();

    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO auto_gift_rules
         (id, user_id, connection_id, event_id, budget_limit, criteria,
          notification_prefs, payment_method_id, enabled, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9)",
        params![
            id, user_id, input.connection_id, input.event_id, input.budget_limit,
            criteria, notification_prefs, input.payment_method_id, now,
        ],
    )?;
    drop(conn);

    get_by_id(pool, &id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_test_db;
    use crate::db::models::{CreateConnectionInput, GiftCriteria, GiftEventInput, RuleNotificationPrefs};
    use crate::db::repos::{connections, gift_events};

    #[test]
    fn test_create_rule_round_trips_json_columns() {
        let pool = init_test_db().unwrap();
        let connection = connections::create_pending(
            &pool,
            "user-1",
            &CreateConnectionInput {
                name: "Sam".into(),
                email: None,
                relationship: "friend".into(),
            },
        )
        .unwrap();
        let event = gift_events::upsert(
            &pool,
            "user-1",
            &GiftEventInput {
                occasion_type: "birthday".into(),
                event_date: chrono::NaiveDate::from_ymd_opt(2027, 6, 1).unwrap(),
                recurring: true,
                label: None,
            },
        )
        .unwrap();

        let rule = create(
            &pool,
            "user-1",
            &CreateAutoGiftRuleInput {
                connection_id: connection.id.clone(),
                event_id: event.id.clone(),
                budget_limit: Some(75.0),
                criteria: GiftCriteria {
                    categories: vec!["books".into()],
                    message: Some("Happy birthday!".into()),
                },
                notification_prefs: RuleNotificationPrefs {
                    days_before: vec![7, 1],
                    email: true,
                },
                payment_method_id: Some("pm_123".into()),
            },
        )
        .unwrap();

        assert!(rule.enabled);
        assert_eq!(rule.criteria.categories, vec!["books"]);
        assert_eq!(rule.notification_prefs.days_before, vec![7, 1]);
        assert_eq!(list_by_user(&pool, "user-1").unwrap(), vec![rule]);
    }

    #[test]
    fn test_unknown_connection_violates_foreign_key() {
        let pool = init_test_db().unwrap();
        let result = create(
            &pool,
            "user-1",
            &CreateAutoGiftRuleInput {
                connection_id: "missing".into(),
                event_id: "missing".into(),
                budget_limit: None,
                criteria: GiftCriteria::default(),
                notification_prefs: RuleNotificationPrefs::default(),
                payment_method_id: None,
            },
        );
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
