//! Scalar types with built-in validation
//!
//! A schema that declares `scalar Date` or `scalar DateTime` gets ISO 8601 validators.
//! Every other declared scalar accepts any value.

use async_graphql::dynamic::Scalar;
use async_graphql::Value;
use chrono::{DateTime as ChronoDateTime, NaiveDate};

/// Create the scalar declared as `name`
pub fn declared_scalar(name: &str) -> Scalar {
    match name {
        "Date" => date_scalar(),
        "DateTime" => datetime_scalar(),
        _ => Scalar::new(name),
    }
}

/// Whether `name` gets a built-in validator
pub fn is_validated_scalar(name: &str) -> bool {
    matches!(name, "Date" | "DateTime")
}

/// ISO 8601 date (YYYY-MM-DD)
fn date_scalar() -> Scalar {
    Scalar::new("Date")
        .description("ISO 8601 date format (YYYY-MM-DD)")
        .validator(is_valid_date)
}

/// ISO 8601 datetime with timezone
fn datetime_scalar() -> Scalar {
    Scalar::new("DateTime")
        .description("ISO 8601 datetime format with timezone")
        .validator(is_valid_datetime)
}

fn is_valid_date(value: &Value) -> bool {
    if let Value::String(s) = value {
        NaiveDate::parse_from_str(s.as_str(), "%Y-%m-%d").is_ok()
    } else {
        false
    }
}

fn is_valid_datetime(value: &Value) -> bool {
    if let Value::String(s) = value {
        ChronoDateTime::parse_from_rfc3339(s.as_str()).is_ok()
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_scalars() {
        assert!(is_validated_scalar("Date"));
        assert!(is_validated_scalar("DateTime"));
        assert!(!is_validated_scalar("Url"));
    }

    #[test]
    fn test_date_validation() {
        assert!(is_valid_date(&Value::String("2024-01-15".to_string())));
        assert!(!is_valid_date(&Value::String("invalid-date".to_string())));
        assert!(!is_valid_date(&Value::Number(20240115.into())));
    }

    #[test]
    fn test_datetime_validation() {
        assert!(is_valid_datetime(&Value::String("2024-01-15T10:00:00Z".to_string())));
        assert!(!is_valid_datetime(&Value::String("not-a-datetime".to_string())));
        assert!(!is_valid_datetime(&Value::Null));
    }
}
