//! Listing traits defining the core abstraction for marketplace items

use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of marketplace listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Vehicle,
    Part,
    Service,
}

impl ItemType {
    pub const ALL: [ItemType; 3] = [ItemType::Vehicle, ItemType::Part, ItemType::Service];

    /// Singular name, as used in favorite records (e.g., "vehicle")
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Vehicle => "vehicle",
            ItemType::Part => "part",
            ItemType::Service => "service",
        }
    }

    /// Plural resource name used in URLs (e.g., "vehicles")
    pub fn resource_name(&self) -> &'static str {
        match self {
            ItemType::Vehicle => "vehicles",
            ItemType::Part => "parts",
            ItemType::Service => "services",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vehicle" | "vehicles" => Ok(ItemType::Vehicle),
            "part" | "parts" => Ok(ItemType::Part),
            "service" | "services" => Ok(ItemType::Service),
            other => Err(format!("unknown item type '{}'", other)),
        }
    }
}

/// Base trait for all listings returned by the list endpoints.
///
/// Listings share an id, a price, a location, a set of images and a
/// creation timestamp. Each kind provides its own card title, subtitle and
/// badges. Implementations are normally generated with `impl_listing!`.
pub trait Listing: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Which kind of listing this is
    const ITEM_TYPE: ItemType;

    /// The plural resource name used in URLs (e.g., "vehicles")
    fn resource_name() -> &'static str {
        Self::ITEM_TYPE.resource_name()
    }

    // === Shared Listing Fields ===

    /// Identifier, normalized to a string
    fn id(&self) -> &str;

    /// Asking price, if the seller published one
    fn price(&self) -> Option<f64>;

    fn location(&self) -> Option<&str>;

    fn images(&self) -> &[String];

    fn created_at(&self) -> Option<DateTime<Utc>>;

    // === Presentation Hooks ===

    /// Main line of the listing card
    fn title(&self) -> String;

    /// Secondary line of the listing card
    fn subtitle(&self) -> Option<String>;

    /// Short labels shown on the card
    fn badges(&self) -> Vec<String>;
}

/// Deserialize an identifier sent either as a JSON string or number
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Text(s) if s.is_empty() => Err(de::Error::custom("empty id")),
        RawId::Text(s) => Ok(s),
        RawId::Int(n) => Ok(n.to_string()),
        RawId::Uint(n) => Ok(n.to_string()),
    }
}

/// Deserialize an optional price sent as a number or numeric string
pub fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    match Option::<RawPrice>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawPrice::Number(n)) => Ok(Some(n)),
        Some(RawPrice::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawPrice::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid price '{}'", s))),
    }
}
