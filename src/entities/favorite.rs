//! Favorite records

use crate::core::entity::{ItemType, deserialize_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a favorite: at most one record per pair per user
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FavoriteKey {
    pub item_type: ItemType,
    #[serde(deserialize_with = "deserialize_id")]
    pub item_id: String,
}

impl FavoriteKey {
    pub fn new(item_type: ItemType, item_id: impl Into<String>) -> Self {
        Self {
            item_type,
            item_id: item_id.into(),
        }
    }
}

impl fmt::Display for FavoriteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.item_type, self.item_id)
    }
}

/// A favorite as returned by `GET /favorites`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// Record id assigned by the backend
    #[serde(default)]
    pub id: Option<serde_json::Value>,

    #[serde(flatten)]
    pub key: FavoriteKey,

    #[serde(default)]
    pub user_id: Option<Uuid>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// The favorited listing, when the backend joins it in
    #[serde(default)]
    pub item: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_with_numeric_item_id() {
        let entry: FavoriteEntry = serde_json::from_value(json!({
            "id": 5,
            "item_type": "vehicle",
            "item_id": 42,
            "user_id": "6f1c2a9e-3b7d-4c55-9a51-0e5d8f2b7c11",
            "created_at": "2024-03-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(entry.key, FavoriteKey::new(ItemType::Vehicle, "42"));
        assert!(entry.user_id.is_some());
        assert_eq!(entry.key.to_string(), "vehicle:42");
    }

    #[test]
    fn test_entry_with_unknown_type_is_rejected() {
        let result = serde_json::from_value::<FavoriteEntry>(json!({
            "item_type": "boat",
            "item_id": "1"
        }));
        assert!(result.is_err());
    }
}
