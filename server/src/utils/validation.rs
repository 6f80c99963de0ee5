//! Payload validation helpers

use chrono::{NaiveDate, NaiveTime};
use shared::AppError;
use validator::Validate;

/// Run `validator` derive checks and convert failures into an [`AppError`]
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(|e| {
        let mut err = AppError::validation("Validation failed");
        for (field, failures) in e.field_errors() {
            let msgs: Vec<String> = failures
                .iter()
                .map(|f| {
                    f.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| f.code.to_string())
                })
                .collect();
            err = err.with_detail(field.to_string(), msgs.join(", "));
        }
        err
    })
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date (expected YYYY-MM-DD): {}", value)))
}

/// Parse an `HH:MM` time of day
pub fn parse_time(value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time (expected HH:MM): {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_valid() {
        assert!(parse_date("2026-02-14").is_ok());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("14/02/2026").is_err());
        assert!(parse_date("2026-13-40").is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(
            parse_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert!(parse_time("9:30pm").is_err());
    }
}
