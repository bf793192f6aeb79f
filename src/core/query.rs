//! Filter, sort and layout state for listing views

use crate::core::error::{MarketError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Query-string keys owned by the view rather than by filters
pub const RESERVED_KEYS: [&str; 3] = ["page", "sort", "layout"];

/// Check whether a query-string key is reserved for page/sort/layout
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Value of a single filter: a scalar or an ordered multi-select list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Single(String),
    Multi(Vec<String>),
}

impl FilterValue {
    /// Whether this value carries nothing and must not be stored
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Single(s) => s.is_empty(),
            FilterValue::Multi(items) => items.iter().all(|s| s.is_empty()),
        }
    }

    /// Drop empty list entries; `None` when nothing is left
    pub fn normalized(self) -> Option<Self> {
        match self {
            FilterValue::Single(s) if s.is_empty() => None,
            FilterValue::Single(s) => Some(FilterValue::Single(s)),
            FilterValue::Multi(items) => {
                let items: Vec<String> = items.into_iter().filter(|s| !s.is_empty()).collect();
                if items.is_empty() {
                    None
                } else {
                    Some(FilterValue::Multi(items))
                }
            }
        }
    }

    /// Individual values, in order
    pub fn values(&self) -> Vec<&str> {
        match self {
            FilterValue::Single(s) => vec![s.as_str()],
            FilterValue::Multi(items) => items.iter().map(String::as_str).collect(),
        }
    }

    /// Comma-joined representation used for request and URL parameters
    pub fn to_param(&self) -> String {
        match self {
            FilterValue::Single(s) => s.clone(),
            FilterValue::Multi(items) => items.join(","),
        }
    }

    /// Whether `value` is one of the selected values
    pub fn contains(&self, value: &str) -> bool {
        self.values().contains(&value)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Single(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Single(s)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(items: Vec<String>) -> Self {
        FilterValue::Multi(items)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(items: Vec<&str>) -> Self {
        FilterValue::Multi(items.into_iter().map(str::to_string).collect())
    }
}

/// The canonical set of active filters for a listing view
///
/// Keys are caller-defined and never validated. Empty values are removed on
/// every write, so the state never holds an empty string or empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    entries: IndexMap<String, FilterValue>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from key/value pairs, dropping empty values
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Option<FilterValue>>,
    {
        let mut state = Self::new();
        state.update(pairs);
        state
    }

    /// Current filter mapping
    pub fn get(&self) -> &IndexMap<String, FilterValue> {
        &self.entries
    }

    /// Value for a single key
    pub fn get_one(&self, key: &str) -> Option<&FilterValue> {
        self.entries.get(key)
    }

    /// Replace the whole state, dropping keys whose value is empty
    pub fn update<I, K, V>(&mut self, new_state: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Option<FilterValue>>,
    {
        self.entries = new_state
            .into_iter()
            .filter_map(|(k, v)| {
                v.into()
                    .and_then(FilterValue::normalized)
                    .map(|v| (k.into(), v))
            })
            .collect();
        tracing::debug!(filters = self.entries.len(), "filter state replaced");
    }

    /// Merge a single key; an empty value deletes the key
    pub fn update_one(&mut self, key: impl Into<String>, value: impl Into<Option<FilterValue>>) {
        let key = key.into();
        match value.into().and_then(FilterValue::normalized) {
            Some(value) => {
                self.entries.insert(key, value);
            }
            None => {
                self.entries.shift_remove(&key);
            }
        }
    }

    /// Remove every filter
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.entries.iter()
    }

    /// Keys currently set
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }
}

/// One entry of a caller-supplied sort option list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOption {
    /// Value sent to the backend and written to the URL (e.g., "price_asc")
    pub key: String,

    /// Human-readable label
    #[serde(default)]
    pub label: String,
}

impl SortOption {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Selected sort key, always one of the supplied options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    options: Vec<SortOption>,
    selected: usize,
}

impl SortState {
    /// Create a sort state; an unknown or missing `requested` key selects the first option
    pub fn new(options: Vec<SortOption>, requested: Option<&str>) -> Result<Self> {
        if options.is_empty() {
            return Err(MarketError::Config(
                "sort options must not be empty".to_string(),
            ));
        }
        let mut state = Self {
            options,
            selected: 0,
        };
        if let Some(key) = requested {
            state.select(key);
        }
        Ok(state)
    }

    /// Select a key, falling back to the first option when it is not offered
    pub fn select(&mut self, key: &str) -> &str {
        self.selected = self
            .options
            .iter()
            .position(|o| o.key == key)
            .unwrap_or(0);
        self.selected()
    }

    /// Reset to the first option
    pub fn reset(&mut self) {
        self.selected = 0;
    }

    pub fn selected(&self) -> &str {
        &self.options[self.selected].key
    }

    pub fn selected_option(&self) -> &SortOption {
        &self.options[self.selected]
    }

    pub fn default_key(&self) -> &str {
        &self.options[0].key
    }

    pub fn is_default(&self) -> bool {
        self.selected == 0
    }

    pub fn options(&self) -> &[SortOption] {
        &self.options
    }
}

/// How a listing page lays out its cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Grid,
    List,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Grid => "grid",
            LayoutMode::List => "list",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "grid" => Ok(LayoutMode::Grid),
            "list" => Ok(LayoutMode::List),
            other => Err(format!("unknown layout '{}'", other)),
        }
    }
}

/// Parameters of a list request
///
/// # Example
/// ```rust,ignore
/// let query = ListQuery::new(filters.clone())
///     .with_sort(sort.selected())
///     .with_page(pager.current_page(), pager.items_per_page());
///
/// // GET /api/vehicles?make=Toyota&color=red,blue&page=2&limit=12&sort=price_asc
/// let page = client.list::<Vehicle>(&query, None).await?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: FilterState,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn new(filters: FilterState) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_page(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page.max(1));
        self.limit = Some(limit.max(1));
        self
    }

    /// Outbound request parameters; empty values are never sent
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .filters
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.clone(), v.to_param()))
            .collect();

        if let Some(page) = self.page {
            params.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(sort) = self.sort.as_ref().filter(|s| !s.is_empty()) {
            params.push(("sort".to_string(), sort.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sort_options() -> Vec<SortOption> {
        vec![
            SortOption::new("newest", "Newest first"),
            SortOption::new("price_asc", "Price: low to high"),
            SortOption::new("price_desc", "Price: high to low"),
        ]
    }

    #[test]
    fn test_update_drops_empty_values() {
        let mut state = FilterState::new();
        state.update(vec![
            ("make", Some(FilterValue::from("Toyota"))),
            ("model", Some(FilterValue::from(""))),
            ("color", Some(FilterValue::from(vec!["", ""]))),
            ("year", None),
        ]);

        assert_eq!(state.len(), 1);
        assert_eq!(state.get_one("make"), Some(&FilterValue::from("Toyota")));
        assert!(state.iter().all(|(_, v)| !v.is_empty()));
    }

    #[test]
    fn test_update_replaces_previous_state() {
        let mut state = FilterState::from_pairs([("make", FilterValue::from("Toyota"))]);
        state.update([("body_type", FilterValue::from("SUV"))]);

        assert!(state.get_one("make").is_none());
        assert_eq!(state.get_one("body_type"), Some(&FilterValue::from("SUV")));
    }

    #[test]
    fn test_update_one_merges_and_deletes() {
        let mut state = FilterState::new();
        state.update_one("make", FilterValue::from("Honda"));
        state.update_one("price_min", FilterValue::from("500000"));
        assert_eq!(state.len(), 2);

        state.update_one("make", FilterValue::from(""));
        assert!(state.get_one("make").is_none());

        state.update_one("price_min", None::<FilterValue>);
        assert!(state.is_empty());
    }

    #[test]
    fn test_multi_value_drops_empty_entries() {
        let mut state = FilterState::new();
        state.update_one("color", FilterValue::from(vec!["red", "", "blue"]));
        assert_eq!(
            state.get_one("color"),
            Some(&FilterValue::from(vec!["red", "blue"]))
        );
    }

    #[test]
    fn test_clear() {
        let mut state = FilterState::from_pairs([("make", FilterValue::from("Mazda"))]);
        state.clear();
        assert!(state.is_empty());
    }

    #[test]
    fn test_sort_defaults_to_first_option() {
        let sort = SortState::new(sort_options(), None).unwrap();
        assert_eq!(sort.selected(), "newest");
        assert!(sort.is_default());
    }

    #[test]
    fn test_sort_invalid_key_falls_back() {
        let mut sort = SortState::new(sort_options(), Some("cheapest")).unwrap();
        assert_eq!(sort.selected(), "newest");

        assert_eq!(sort.select("price_desc"), "price_desc");
        assert_eq!(sort.select("bogus"), "newest");
    }

    #[test]
    fn test_sort_requires_options() {
        let err = SortState::new(vec![], None).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!("list".parse::<LayoutMode>(), Ok(LayoutMode::List));
        assert!("table".parse::<LayoutMode>().is_err());
        assert_eq!(LayoutMode::default().to_string(), "grid");
    }

    #[test]
    fn test_list_query_params() {
        let filters = FilterState::from_pairs([
            ("make", FilterValue::from("Toyota")),
            ("color", FilterValue::from(vec!["red", "blue"])),
        ]);
        let query = ListQuery::new(filters)
            .with_sort("price_asc")
            .with_page(2, 12);

        assert_eq!(
            query.to_params(),
            vec![
                ("make".to_string(), "Toyota".to_string()),
                ("color".to_string(), "red,blue".to_string()),
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "12".to_string()),
                ("sort".to_string(), "price_asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_query_skips_empty_sort() {
        let query = ListQuery::new(FilterState::new()).with_sort("");
        assert!(query.to_params().is_empty());
    }
}
