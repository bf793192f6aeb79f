//! Response envelope and per-endpoint payload schemas
//!
//! Every backend response is wrapped as
//! `{ "success": bool, "data"?: T, "message"?: string }`; list endpoints may
//! add `total` and `stats`. The envelope is checked before the payload is
//! decoded, so a `success: false` answer surfaces its message even when
//! `data` is missing or malformed.

use crate::core::error::{MarketError, Result};
use crate::entities::User;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,

    #[serde(default = "Option::default")]
    pub data: Option<T>,

    #[serde(default)]
    pub message: Option<String>,

    /// Aggregates some list endpoints attach (counts per make, price ranges)
    #[serde(default)]
    pub stats: Option<Value>,

    /// Total number of matching items for list endpoints
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T: DeserializeOwned> ApiEnvelope<T> {
    /// Check the envelope flag, then decode the payload
    pub fn from_value(endpoint: &str, value: Value) -> Result<Self> {
        let success = value
            .get("success")
            .and_then(Value::as_bool)
            .ok_or_else(|| MarketError::decode(endpoint, "missing 'success' flag"))?;

        if !success {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or("The request was rejected")
                .to_string();
            return Err(MarketError::Rejected { message });
        }

        serde_json::from_value(value).map_err(|e| MarketError::decode(endpoint, e))
    }

    /// Payload, which must be present
    pub fn into_data(self, endpoint: &str) -> Result<T> {
        self.data
            .ok_or_else(|| MarketError::decode(endpoint, "missing 'data'"))
    }
}

/// Body of an error response; the backend puts the reason in one of these
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListPage<T> {
    pub items: Vec<T>,

    /// Total number of matches across all pages, when the endpoint reports it
    pub total: Option<u64>,

    pub stats: Option<Value>,
}

impl<T> ListPage<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total to paginate against when this page was fetched as `page` of
    /// `items_per_page`
    ///
    /// Without a reported total, the count is known only up to this page; a
    /// full page leaves room for one more.
    pub fn known_total(&self, page: u32, items_per_page: u32) -> u64 {
        if let Some(total) = self.total {
            return total;
        }
        let per_page = items_per_page.max(1) as u64;
        let seen = (page.max(1) as u64 - 1) * per_page + self.items.len() as u64;
        if self.items.len() as u64 >= per_page {
            seen + 1
        } else {
            seen
        }
    }
}

impl<T: DeserializeOwned> ListPage<T> {
    pub(crate) fn from_envelope(endpoint: &str, envelope: ApiEnvelope<Vec<T>>) -> Result<Self> {
        let ApiEnvelope {
            data, total, stats, ..
        } = envelope;
        let items = data.ok_or_else(|| MarketError::decode(endpoint, "missing 'data'"))?;
        Ok(Self {
            items,
            total,
            stats,
        })
    }
}

/// `data` of `/auth/login` and `/auth/register`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthData {
    /// Absent on registration when the account still needs confirming
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub user: Option<User>,
}

/// `data` of `/auth/verify`
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyData {
    pub user: User,
}

/// `data` entry of `/upload/images` and `/upload/single`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    /// Public URL of the stored image
    pub url: String,

    /// Stored filename, used to delete the image later
    #[serde(default)]
    pub filename: Option<String>,

    #[serde(default)]
    pub size: Option<u64>,
}
