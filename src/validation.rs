use crate::error::AppError;

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub fn require_valid_id(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must be a valid ID")));
    }
    Ok(())
}

/// Amounts are dollars; negative or non-finite values are rejected.
pub fn require_amount(field: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!(
            "{field} must be a non-negative amount"
        )));
    }
    Ok(())
}

pub fn require_budget_range(min: f64, max: f64) -> Result<(), AppError> {
    require_amount("budget min", min)?;
    require_amount("budget max", max)?;
    if min > max {
        return Err(AppError::Validation(format!(
            "budget min ({min}) must not exceed max ({max})"
        )));
    }
    Ok(())
}

/// Longest reminder lead-time a rule may carry.
pub const MAX_NOTIFICATION_DAYS: u32 = 60;

pub fn require_notification_days(days: &[u32]) -> Result<(), AppError> {
    match days.iter().find(|d| **d == 0 || **d > MAX_NOTIFICATION_DAYS) {
        Some(bad) => Err(AppError::Validation(format!(
            "notification days must be within 1..={MAX_NOTIFICATION_DAYS}, got {bad}"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_range() {
        assert!(require_budget_range(10.0, 50.0).is_ok());
        assert!(require_budget_range(50.0, 50.0).is_ok());
        assert!(require_budget_range(60.0, 50.0).is_err());
        assert!(require_budget_range(-1.0, 50.0).is_err());
        assert!(require_budget_range(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_non_empty() {
        assert!(require_non_empty("name", "Sam").is_ok());
        assert!(require_non_empty("name", "   ").is_err());
        assert!(require_valid_id("id", "").is_err());
    }

    #[test]
    fn test_notification_days() {
        assert!(require_notification_days(&[]).is_ok());
        assert!(require_notification_days(&[7, 1]).is_ok());
        assert!(require_notification_days(&[7, 0]).is_err());
        assert!(require_notification_days(&[61]).is_err());
    }
}
