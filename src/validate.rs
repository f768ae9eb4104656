//! Field validators shared by the profile, entry and auth services. Each
//! validator reports the first offending field so callers can fix and resubmit.

use lazy_static::lazy_static;
use regex::Regex;
use time::Date;

use crate::dates;
use crate::error::ApiError;

pub const MIN_HEIGHT_CM: f64 = 50.0;
pub const MAX_HEIGHT_CM: f64 = 300.0;
pub const MIN_WEIGHT_KG: f64 = 20.0;
pub const MAX_WEIGHT_KG: f64 = 500.0;
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn date(field: &'static str, raw: &str) -> Result<Date, ApiError> {
    dates::parse_date(raw)
        .map_err(|_| ApiError::validation(field, "invalid date, expected YYYY-MM-DD"))
}

pub fn height(field: &'static str, value: f64) -> Result<f64, ApiError> {
    if !value.is_finite() || !(MIN_HEIGHT_CM..=MAX_HEIGHT_CM).contains(&value) {
        return Err(ApiError::validation(
            field,
            "height must be between 50 and 300 cm",
        ));
    }
    Ok(value)
}

pub fn weight(field: &'static str, value: f64) -> Result<f64, ApiError> {
    if !value.is_finite() || !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&value) {
        return Err(ApiError::validation(
            field,
            "weight must be between 20 and 500 kg",
        ));
    }
    Ok(value)
}

pub fn meal(field: &'static str, raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(field, "meal description is required"));
    }
    Ok(trimmed.to_string())
}

pub fn email(raw: &str) -> Result<String, ApiError> {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    let normalized = raw.trim().to_lowercase();
    if !EMAIL_RE.is_match(&normalized) {
        return Err(ApiError::validation("email", "invalid email format"));
    }
    Ok(normalized)
}

pub fn username(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("username", "username is required"));
    }
    if trimmed.contains('@') {
        return Err(ApiError::validation(
            "username",
            "username cannot contain the @ symbol",
        ));
    }
    Ok(trimmed.to_string())
}

pub fn password(raw: &str) -> Result<(), ApiError> {
    if raw.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(
            "password",
            "password must be at least 6 characters long",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date as d;

    fn field_of(err: ApiError) -> &'static str {
        match err {
            ApiError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn date_accepts_iso_and_reports_field() {
        assert_eq!(date("date", "2024-01-15").expect("valid"), d!(2024 - 01 - 15));
        assert_eq!(field_of(date("birth_date", "15.01.2024").unwrap_err()), "birth_date");
    }

    #[test]
    fn height_bounds_are_inclusive() {
        assert!(height("height", 50.0).is_ok());
        assert!(height("height", 300.0).is_ok());
        assert_eq!(field_of(height("initial_height", 10.0).unwrap_err()), "initial_height");
        assert!(height("height", 300.5).is_err());
        assert!(height("height", f64::NAN).is_err());
    }

    #[test]
    fn weight_bounds_are_inclusive() {
        assert!(weight("weight", 20.0).is_ok());
        assert!(weight("weight", 500.0).is_ok());
        assert_eq!(field_of(weight("weight", 1000.0).unwrap_err()), "weight");
    }

    #[test]
    fn meals_must_be_non_empty_after_trim() {
        assert_eq!(meal("lunch", "  salad  ").expect("valid"), "salad");
        assert_eq!(field_of(meal("lunch", "   ").unwrap_err()), "lunch");
    }

    #[test]
    fn email_is_normalized_and_checked() {
        assert_eq!(email("  User@Example.COM ").expect("valid"), "user@example.com");
        assert!(email("not-an-email").is_err());
        assert!(email("a@b").is_err());
    }

    #[test]
    fn username_rejects_at_symbol() {
        assert_eq!(username(" alice ").expect("valid"), "alice");
        assert!(username("al@ice").is_err());
        assert!(username("   ").is_err());
    }

    #[test]
    fn password_requires_minimum_length() {
        assert!(password("secret").is_ok());
        assert!(password("short").is_err());
    }
}
