//! Typed error handling for the Car Mart client
//!
//! Every failure path in the client returns a [`MarketError`] instead of a
//! bare message string. Callers that only need something to show in the UI
//! use [`MarketError::user_message`]; callers that want to branch on the
//! failure kind match on the variant or on [`MarketError::error_code`].
//!
//! # Error Categories
//!
//! - Transport failures (the request never produced an HTTP response)
//! - [`MarketError::Api`]: non-success HTTP status, with the backend message
//! - [`MarketError::Rejected`]: `success: false` envelope, with the backend message
//! - [`ValidationError`]: local checks that block a request from being sent
//! - [`SessionError`]: failures of the persisted session backend
//!
//! # Example
//!
//! ```rust,ignore
//! match client.upload_images(files, None).await {
//!     Ok(urls) => show(urls),
//!     Err(MarketError::Validation(e)) => highlight_picker(e),
//!     Err(MarketError::Unauthenticated) => redirect_to_login(),
//!     Err(e) => toast(e.user_message()),
//! }
//! ```

use reqwest::StatusCode;
use thiserror::Error;

/// The main error type for the Car Mart client
#[derive(Debug, Error)]
pub enum MarketError {
    /// The request could not be sent or no response was received
    #[error("Network error: {message}")]
    Transport { message: String },

    /// The backend answered with a non-success HTTP status
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    /// The backend answered 2xx but flagged the payload with `success: false`
    #[error("{message}")]
    Rejected { message: String },

    /// The payload did not match the schema expected for the endpoint
    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// An authenticated call was attempted without a session token
    #[error("You must be logged in to do that")]
    Unauthenticated,

    /// The owning view was closed before the response arrived
    #[error("Request cancelled")]
    Cancelled,

    /// Local validation failed; nothing was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Session persistence failed
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MarketError {
    /// Machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            MarketError::Transport { .. } => "NETWORK_ERROR",
            MarketError::Api { status, .. } => match *status {
                StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
                StatusCode::FORBIDDEN => "FORBIDDEN",
                StatusCode::NOT_FOUND => "NOT_FOUND",
                StatusCode::CONFLICT => "CONFLICT",
                s if s.is_client_error() => "BAD_REQUEST",
                _ => "SERVER_ERROR",
            },
            MarketError::Rejected { .. } => "REJECTED",
            MarketError::Decode { .. } => "DECODE_ERROR",
            MarketError::Unauthenticated => "UNAUTHENTICATED",
            MarketError::Cancelled => "CANCELLED",
            MarketError::Validation(e) => e.error_code(),
            MarketError::Session(_) => "SESSION_ERROR",
            MarketError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// HTTP status of the response, when there was one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            MarketError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Single human-readable string for UI surfaces
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Whether the backend refused the session token
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, MarketError::Unauthenticated)
            || self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Build an API error, falling back to the status reason when the body had no message
    pub(crate) fn api(status: StatusCode, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                format!(
                    "Request failed: {}",
                    status.canonical_reason().unwrap_or("unknown status")
                )
            });
        MarketError::Api { status, message }
    }

    pub(crate) fn decode(endpoint: impl Into<String>, message: impl ToString) -> Self {
        MarketError::Decode {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }
}

impl From<reqwest::Error> for MarketError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            let endpoint = err
                .url()
                .map(|u| u.path().to_string())
                .unwrap_or_default();
            return MarketError::decode(endpoint, err);
        }
        if let Some(status) = err.status() {
            return MarketError::api(status, None);
        }
        MarketError::Transport {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Local validation failures, detected before any request is issued
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No file was supplied to an upload
    #[error("Please select at least one file")]
    NoFiles,

    /// More files than the upload endpoint accepts
    #[error("You can upload at most {max} files (got {actual})")]
    TooManyFiles { max: usize, actual: usize },

    /// A file exceeds the size limit
    #[error("'{name}' is too large ({size} bytes, max {max} bytes)")]
    FileTooLarge { name: String, size: usize, max: usize },

    /// A file has a MIME type that is not accepted
    #[error("'{name}' has unsupported type '{mime}'")]
    UnsupportedMimeType { name: String, mime: String },

    /// A stored filename is not safe to put in a path segment
    #[error("Invalid filename '{filename}'")]
    InvalidFilename { filename: String },

    /// A form field failed a check
    #[error("{field}: {message}")]
    FieldError { field: String, message: String },

    /// The comparison list is full
    #[error("You can compare at most {max} items")]
    CompareFull { max: usize },

    /// The comparison list holds a different kind of listing
    #[error("Cannot compare a {actual} with {expected}s")]
    CompareTypeMismatch { expected: String, actual: String },
}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::NoFiles => "NO_FILES",
            ValidationError::TooManyFiles { .. } => "TOO_MANY_FILES",
            ValidationError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            ValidationError::UnsupportedMimeType { .. } => "UNSUPPORTED_MIME_TYPE",
            ValidationError::InvalidFilename { .. } => "INVALID_FILENAME",
            ValidationError::FieldError { .. } => "VALIDATION_ERROR",
            ValidationError::CompareFull { .. } => "COMPARE_FULL",
            ValidationError::CompareTypeMismatch { .. } => "COMPARE_TYPE_MISMATCH",
        }
    }

    pub(crate) fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Session Errors
// =============================================================================

/// Errors raised by a session backend
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the persisted session failed
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted session could not be parsed
    #[error("Stored session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Result alias used across the client
pub type Result<T, E = MarketError> = std::result::Result<T, E>;
