//! Reusable field validators
//!
//! Each validator receives the field name and the value to check

use crate::core::error::ValidationError;
use regex::Regex;
use std::sync::OnceLock;

/// Validator: field must not be empty
pub fn required() -> impl Fn(&str, &str) -> Result<(), ValidationError> + Send + Sync + Clone {
    |field: &str, value: &str| {
        if value.trim().is_empty() {
            Err(ValidationError::field(field, "is required"))
        } else {
            Ok(())
        }
    }
}

/// Validator: string must have at least `min` characters
pub fn min_length(
    min: usize,
) -> impl Fn(&str, &str) -> Result<(), ValidationError> + Send + Sync + Clone {
    move |field: &str, value: &str| {
        let len = value.chars().count();
        if len < min {
            Err(ValidationError::field(
                field,
                format!("must be at least {} characters (got {})", min, len),
            ))
        } else {
            Ok(())
        }
    }
}

/// Validator: string must look like an email address
pub fn email() -> impl Fn(&str, &str) -> Result<(), ValidationError> + Send + Sync + Clone {
    |field: &str, value: &str| {
        static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = EMAIL_REGEX.get_or_init(|| {
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
        });
        if regex.is_match(value) {
            Ok(())
        } else {
            Err(ValidationError::field(field, "must be a valid email address"))
        }
    }
}

/// Validator: optional phone number in E.164-like form
pub fn phone() -> impl Fn(&str, &str) -> Result<(), ValidationError> + Send + Sync + Clone {
    |field: &str, value: &str| {
        static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
        // At least 8 digits, max 15
        let regex = PHONE_REGEX.get_or_init(|| Regex::new(r"^\+?[1-9]\d{7,14}$").unwrap());
        let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() || regex.is_match(&compact) {
            Ok(())
        } else {
            Err(ValidationError::field(field, "must be a valid phone number"))
        }
    }
}

/// Check that a stored upload filename is safe to use as a path segment
pub fn safe_filename(filename: &str) -> Result<(), ValidationError> {
    static FILENAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = FILENAME_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").unwrap());
    if regex.is_match(filename) && filename != "." && filename != ".." {
        Ok(())
    } else {
        Err(ValidationError::InvalidFilename {
            filename: filename.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === required() ===

    #[test]
    fn test_required_blank_returns_error() {
        let v = required();
        let err = v("name", "   ").unwrap_err();
        assert_eq!(err.to_string(), "name: is required");
    }

    #[test]
    fn test_required_value_returns_ok() {
        assert!(required()("name", "Jane").is_ok());
    }

    // === min_length() ===

    #[test]
    fn test_min_length_too_short() {
        let v = min_length(6);
        let err = v("password", "abc").unwrap_err();
        assert!(err.to_string().contains("at least 6"));
    }

    #[test]
    fn test_min_length_counts_chars() {
        let v = min_length(3);
        assert!(v("name", "été").is_ok());
    }

    // === email() ===

    #[test]
    fn test_email_valid() {
        assert!(email()("email", "jane@example.com").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        assert!(email()("email", "jane@").is_err());
        assert!(email()("email", "not an email").is_err());
    }

    // === phone() ===

    #[test]
    fn test_phone_accepts_spaced_number() {
        assert!(phone()("phone", "+254 712 345 678").is_ok());
    }

    #[test]
    fn test_phone_empty_is_ok() {
        assert!(phone()("phone", "").is_ok());
    }

    #[test]
    fn test_phone_rejects_letters() {
        assert!(phone()("phone", "call me").is_err());
    }

    // === safe_filename() ===

    #[test]
    fn test_safe_filename() {
        assert!(safe_filename("1699999999-car.jpg").is_ok());
        assert!(safe_filename("../etc/passwd").is_err());
        assert!(safe_filename("..").is_err());
        assert!(safe_filename("").is_err());
        assert!(safe_filename("a b.png").is_err());
    }
}
