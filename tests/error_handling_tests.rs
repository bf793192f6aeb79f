//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Every failure category has a distinct machine-readable code
//! - Every error collapses to a single user-facing message
//! - Error matching allows clients to handle specific cases

use carmart::prelude::*;

// =============================================================================
// Error Code Tests
// =============================================================================

mod error_code_tests {
    use super::*;

    #[test]
    fn test_local_errors_have_distinct_codes() {
        let errors: Vec<MarketError> = vec![
            MarketError::Unauthenticated,
            MarketError::Cancelled,
            MarketError::Config("bad".to_string()),
            MarketError::Rejected {
                message: "nope".to_string(),
            },
            ValidationError::NoFiles.into(),
            ValidationError::CompareFull { max: 4 }.into(),
        ];
        let codes: Vec<&str> = errors.iter().map(|e| e.error_code()).collect();
        assert_eq!(
            codes,
            vec![
                "UNAUTHENTICATED",
                "CANCELLED",
                "CONFIG_ERROR",
                "REJECTED",
                "NO_FILES",
                "COMPARE_FULL"
            ]
        );
    }

    #[test]
    fn test_session_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: MarketError = SessionError::from(io).into();
        assert_eq!(err.error_code(), "SESSION_ERROR");
        assert!(err.user_message().contains("denied"));
    }
}

// =============================================================================
// User Message Tests
// =============================================================================

mod user_message_tests {
    use super::*;

    #[test]
    fn test_rejected_message_is_shown_verbatim() {
        let err = MarketError::Rejected {
            message: "Listing has been sold".to_string(),
        };
        assert_eq!(err.user_message(), "Listing has been sold");
    }

    #[test]
    fn test_validation_messages() {
        let err: MarketError = ValidationError::FileTooLarge {
            name: "engine.jpg".to_string(),
            size: 6_000_000,
            max: 5_242_880,
        }
        .into();
        assert_eq!(
            err.user_message(),
            "'engine.jpg' is too large (6000000 bytes, max 5242880 bytes)"
        );
    }

    #[test]
    fn test_compare_mismatch_message() {
        let mut compare = CompareList::new(4);
        compare.add(ItemType::Vehicle, "1").unwrap();
        let err = compare.add(ItemType::Part, "2").unwrap_err();
        assert_eq!(err.to_string(), "Cannot compare a part with vehicles");
    }
}

// =============================================================================
// Error Matching Tests
// =============================================================================

mod matching_tests {
    use super::*;

    fn describe(err: &MarketError) -> &'static str {
        match err {
            MarketError::Validation(_) => "fix the form",
            MarketError::Unauthenticated => "log in",
            e if e.is_auth_failure() => "log in again",
            MarketError::Cancelled => "ignore",
            _ => "show toast",
        }
    }

    #[test]
    fn test_match_on_categories() {
        assert_eq!(describe(&ValidationError::NoFiles.into()), "fix the form");
        assert_eq!(describe(&MarketError::Unauthenticated), "log in");
        assert_eq!(describe(&MarketError::Cancelled), "ignore");
        assert_eq!(
            describe(&MarketError::Transport {
                message: "connection refused".to_string()
            }),
            "show toast"
        );
    }
}
