//! Pure field validators.
//!
//! Each validator trims its input and returns either the cleaned value or a
//! [`FieldViolation`] naming the field. Forms collect violations across all
//! fields before rejecting, so the user sees every problem at once.

use crate::riskboard_error::FieldViolation;

/// A non-empty value after trimming.
pub fn required(field: &'static str, value: &str) -> Result<String, FieldViolation> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FieldViolation::new(field, "is required"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// A required value with a minimum length after trimming.
pub fn min_len(field: &'static str, value: &str, min: usize) -> Result<String, FieldViolation> {
    let trimmed = required(field, value)?;
    if trimmed.chars().count() < min {
        Err(FieldViolation::new(
            field,
            format!("must be at least {min} characters"),
        ))
    } else {
        Ok(trimmed)
    }
}

/// A required value that must look like an email address.
///
/// Deliverability is the backend's problem; this only catches obvious typos
/// before a round trip.
pub fn email(field: &'static str, value: &str) -> Result<String, FieldViolation> {
    let trimmed = required(field, value)?;
    let looks_like_email = trimmed
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if looks_like_email {
        Ok(trimmed)
    } else {
        Err(FieldViolation::new(field, "must be a valid email address"))
    }
}

/// An optional value: trimmed, with an empty string meaning "not provided".
pub fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// An optional enrollment year within the plausible range.
pub fn year(field: &'static str, value: &str) -> Result<Option<u8>, FieldViolation> {
    match optional(value) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u8>()
            .ok()
            .filter(|parsed| (1..=8).contains(parsed))
            .map(Some)
            .ok_or_else(|| FieldViolation::new(field, "must be a year between 1 and 8")),
    }
}

/// Unwraps a validator result, pushing any violation onto the list.
pub fn take<T>(
    result: Result<T, FieldViolation>,
    violations: &mut Vec<FieldViolation>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(violation) => {
            violations.push(violation);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", "  Ada  ").unwrap(), "Ada");
        assert!(required("name", "   ").is_err());
    }

    #[test]
    fn test_min_len_counts_after_trim() {
        assert!(min_len("password", "  ab  ", 6).is_err());
        assert_eq!(min_len("password", "hunter2", 6).unwrap(), "hunter2");
    }

    #[test]
    fn test_email_shape() {
        assert!(email("email", "ada@example.edu").is_ok());
        assert!(email("email", "ada@localhost").is_err());
        assert!(email("email", "not-an-email").is_err());
        assert!(email("email", "@example.edu").is_err());
    }

    #[test]
    fn test_optional_empty_is_none() {
        assert_eq!(optional("  "), None);
        assert_eq!(optional(" math "), Some("math".to_string()));
    }

    #[test]
    fn test_year_range() {
        assert_eq!(year("year", "").unwrap(), None);
        assert_eq!(year("year", "3").unwrap(), Some(3));
        assert!(year("year", "0").is_err());
        assert!(year("year", "12").is_err());
        assert!(year("year", "abc").is_err());
    }
}
