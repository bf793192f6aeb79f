//! Configuration loading and management

use crate::core::entity::ItemType;
use crate::core::error::MarketError;
use crate::core::query::SortOption;
use crate::url_sync::ArrayEncoding;
use anyhow::Result;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding `base_url`
pub const ENV_API_URL: &str = "CARMART_API_URL";

/// Environment variable overriding `timeout_secs`
pub const ENV_TIMEOUT_SECS: &str = "CARMART_TIMEOUT_SECS";

/// Local limits applied to image uploads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadLimits {
    /// Maximum number of files per multi-file upload
    pub max_files: usize,

    /// Maximum size of a single file, in bytes
    pub max_file_size: usize,

    /// Accepted MIME types
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_files: 10,
            max_file_size: 5 * 1024 * 1024,
            allowed_mime_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
                "image/gif".to_string(),
            ],
        }
    }
}

/// Complete configuration for the marketplace client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the API, including the `/api` prefix
    pub base_url: String,

    /// Per-request timeout; `None` waits for the transport to give up
    pub timeout_secs: Option<u64>,

    /// Default page size for list views
    pub items_per_page: u32,

    /// How multi-select filters are written to the URL
    pub array_encoding: ArrayEncoding,

    /// Prefix used when formatting prices
    pub currency: String,

    /// Image shown on cards for listings without photos
    pub placeholder_image: String,

    /// Upload limits checked before sending files
    pub upload: UploadLimits,

    /// How many listings can be compared at once
    pub compare_max_items: usize,

    /// Sort options per listing kind; the first entry is the default
    pub sort_options: HashMap<ItemType, Vec<SortOption>>,

    /// Where to persist the session; in-memory when unset
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_secs: None,
            items_per_page: 12,
            array_encoding: ArrayEncoding::default(),
            currency: "KSh".to_string(),
            placeholder_image: "/images/placeholder-car.jpg".to_string(),
            upload: UploadLimits::default(),
            compare_max_items: crate::core::compare::DEFAULT_COMPARE_MAX,
            sort_options: HashMap::new(),
            session_file: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `CARMART_*` environment overrides
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.is_empty()) {
            let secs: u64 = raw.parse().map_err(|_| {
                MarketError::Config(format!("{} must be a number of seconds", ENV_TIMEOUT_SECS))
            })?;
            self.timeout_secs = (secs > 0).then_some(secs);
        }
        self.validate()?;
        Ok(self)
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<(), MarketError> {
        self.api_base()?;
        if self.items_per_page == 0 {
            return Err(MarketError::Config(
                "items_per_page must be positive".to_string(),
            ));
        }
        if self.upload.max_files == 0 || self.upload.max_file_size == 0 {
            return Err(MarketError::Config(
                "upload limits must be positive".to_string(),
            ));
        }
        if let Some((item_type, _)) = self.sort_options.iter().find(|(_, o)| o.is_empty()) {
            return Err(MarketError::Config(format!(
                "sort options for {} must not be empty",
                item_type
            )));
        }
        Ok(())
    }

    /// Parsed base URL, normalized to end with a slash so joins stay under it
    pub fn api_base(&self) -> Result<Url, MarketError> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw)
            .map_err(|e| MarketError::Config(format!("invalid base_url '{}': {}", self.base_url, e)))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Sort options for a listing kind, falling back to the built-in set
    pub fn sort_options_for(&self, item_type: ItemType) -> Vec<SortOption> {
        self.sort_options
            .get(&item_type)
            .cloned()
            .unwrap_or_else(|| default_sort_options(item_type))
    }
}

/// Built-in sort options per listing kind
pub fn default_sort_options(item_type: ItemType) -> Vec<SortOption> {
    let mut options = vec![
        SortOption::new("newest", "Newest first"),
        SortOption::new("price_asc", "Price: low to high"),
        SortOption::new("price_desc", "Price: high to low"),
    ];
    match item_type {
        ItemType::Vehicle => {
            options.push(SortOption::new("year_desc", "Year: newest"));
            options.push(SortOption::new("mileage_asc", "Mileage: lowest"));
        }
        ItemType::Part => options.push(SortOption::new("name_asc", "Name: A to Z")),
        ItemType::Service => options.push(SortOption::new("rating_desc", "Top rated")),
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.items_per_page, 12);
        assert_eq!(
            config.api_base().unwrap().as_str(),
            "http://localhost:5000/api/"
        );
    }

    #[test]
    fn test_yaml_serialization() {
        let config = ClientConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();

        // Should be able to parse it back
        let parsed = ClientConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = ClientConfig::from_yaml_str(
            r#"
base_url: https://carmart.example/api
items_per_page: 24
sort_options:
  vehicle:
    - key: price_asc
      label: Cheapest
"#,
        )
        .unwrap();

        assert_eq!(config.items_per_page, 24);
        assert_eq!(config.upload, UploadLimits::default());
        assert_eq!(config.sort_options_for(ItemType::Vehicle)[0].key, "price_asc");
        assert_eq!(config.sort_options_for(ItemType::Part)[0].key, "newest");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(ClientConfig::from_yaml_str("base_url: not a url").is_err());
    }

    #[test]
    fn test_empty_sort_options_rejected() {
        let result = ClientConfig::from_yaml_str("sort_options:\n  part: []\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::default()
            .with_overrides(|key| match key {
                ENV_API_URL => Some("https://staging.example/api".to_string()),
                ENV_TIMEOUT_SECS => Some("15".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.base_url, "https://staging.example/api");
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_bad_timeout_override() {
        let result = ClientConfig::default().with_overrides(|key| {
            (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }
}
