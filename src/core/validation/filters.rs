//! Reusable input filters
//!
//! These filters normalize form input before validation

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str) -> String + Send + Sync + Clone {
    |value: &str| value.trim().to_string()
}

/// Filter: convert string to lowercase
pub fn lowercase() -> impl Fn(&str) -> String + Send + Sync + Clone {
    |value: &str| value.to_lowercase()
}

/// Filter: trimmed, lowercased email address
pub fn normalize_email(email: &str) -> String {
    lowercase()(&trim()(email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_removes_whitespace() {
        assert_eq!(trim()("  hello  "), "hello");
        assert_eq!(trim()("   "), "");
    }

    #[test]
    fn test_lowercase_converts_string() {
        assert_eq!(lowercase()("Hello@WORLD.com"), "hello@world.com");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }
}
