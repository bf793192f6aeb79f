//! Mirrors listing view state into the address bar query string
//!
//! The synchronizer reads the URL once when a view opens, then owns it:
//! every filter, sort, page or layout change rewrites the query string.
//! It does not watch the URL by itself. A caller that wants history
//! navigation (back/forward) to be reflected in the view passes the new
//! URL to [`UrlSynchronizer::on_navigation`].
//!
//! # Array encoding
//!
//! Multi-select filters need a list representation in the query string:
//!
//! - [`ArrayEncoding::Comma`] writes `color=red,blue` and splits any value
//!   containing a comma when reading. A single value that contains a comma
//!   therefore comes back as a list.
//! - [`ArrayEncoding::RepeatedKey`] writes `color=red&color=blue`. Commas
//!   inside values are preserved.
//!
//! Both modes merge repeated keys into a list when reading.

use crate::core::error::ValidationError;
use crate::core::query::{FilterState, FilterValue, LayoutMode, SortState, is_reserved_key};
use indexmap::IndexMap;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// How lists are encoded in the query string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayEncoding {
    #[default]
    Comma,
    RepeatedKey,
}

/// Parse filters from query pairs, skipping reserved keys
pub fn parse_filters<'a, I>(pairs: I, encoding: ArrayEncoding) -> FilterState
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut collected: IndexMap<String, (Vec<String>, bool)> = IndexMap::new();

    for (key, value) in pairs {
        if key.is_empty() || is_reserved_key(key) {
            continue;
        }
        let (segments, split) = match encoding {
            ArrayEncoding::Comma if value.contains(',') => (
                value
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>(),
                true,
            ),
            _ if value.is_empty() => (Vec::new(), false),
            _ => (vec![value.to_string()], false),
        };
        if segments.is_empty() {
            continue;
        }

        let entry = collected
            .entry(key.to_string())
            .or_insert_with(|| (Vec::new(), false));
        let repeated = !entry.0.is_empty();
        entry.0.extend(segments);
        entry.1 |= split || repeated;
    }

    FilterState::from_pairs(collected.into_iter().map(|(key, (mut values, multi))| {
        let value = if multi || values.len() > 1 {
            FilterValue::Multi(values)
        } else {
            FilterValue::Single(values.remove(0))
        };
        (key, value)
    }))
}

/// Encode filters as query pairs
pub fn encode_filters(filters: &FilterState, encoding: ArrayEncoding) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in filters.iter() {
        match (value, encoding) {
            (FilterValue::Multi(items), ArrayEncoding::RepeatedKey) => {
                pairs.extend(items.iter().map(|item| (key.clone(), item.clone())));
            }
            _ => pairs.push((key.clone(), value.to_param())),
        }
    }
    pairs
}

/// Owns the query string of a listing view's URL
#[derive(Debug, Clone)]
pub struct UrlSynchronizer {
    url: Url,
    encoding: ArrayEncoding,
    /// Filter keys this synchronizer is responsible for
    owned_keys: Vec<String>,
}

impl UrlSynchronizer {
    /// Start from the URL the view was opened with
    pub fn new(url: Url, encoding: ArrayEncoding) -> Self {
        let mut sync = Self {
            url,
            encoding,
            owned_keys: Vec::new(),
        };
        sync.owned_keys = sync.filters().keys().cloned().collect();
        sync
    }

    /// Parse a URL string and start from it
    pub fn from_url(url: &str, encoding: ArrayEncoding) -> Result<Self, ValidationError> {
        let url = Url::parse(url).map_err(|e| ValidationError::field("url", e.to_string()))?;
        Ok(Self::new(url, encoding))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn encoding(&self) -> ArrayEncoding {
        self.encoding
    }

    /// Current query string without the leading `?`
    pub fn query_string(&self) -> &str {
        self.url.query().unwrap_or("")
    }

    fn pairs(&self) -> Vec<(String, String)> {
        self.url.query_pairs().into_owned().collect()
    }

    fn reserved(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    }

    /// Filters currently encoded in the URL
    pub fn filters(&self) -> FilterState {
        let pairs = self.pairs();
        parse_filters(
            pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            self.encoding,
        )
    }

    /// Page requested by the URL; invalid values are ignored
    pub fn page(&self) -> Option<u32> {
        self.reserved("page")
            .and_then(|p| p.parse::<u32>().ok())
            .filter(|p| *p >= 1)
    }

    pub fn sort(&self) -> Option<String> {
        self.reserved("sort")
    }

    /// Layout requested by the URL; unknown values fall back to the default
    pub fn layout(&self) -> LayoutMode {
        self.reserved("layout")
            .and_then(|l| l.parse().ok())
            .unwrap_or_default()
    }

    fn rewrite<F>(&mut self, drop_key: F, additions: Vec<(String, String)>)
    where
        F: Fn(&str) -> bool,
    {
        let kept: Vec<(String, String)> = self
            .pairs()
            .into_iter()
            .filter(|(k, _)| !drop_key(k))
            .collect();

        if kept.is_empty() && additions.is_empty() {
            self.url.set_query(None);
        } else {
            self.url
                .query_pairs_mut()
                .clear()
                .extend_pairs(kept)
                .extend_pairs(additions);
        }
        tracing::debug!(query = self.query_string(), "url rewritten");
    }

    /// Write filters to the URL
    ///
    /// Every key previously written for filters is removed first, then one
    /// parameter per surviving key is set. Reserved and unrelated
    /// parameters are kept.
    pub fn apply(&mut self, filters: &FilterState) {
        let previous = std::mem::take(&mut self.owned_keys);
        let next: Vec<String> = filters.keys().cloned().collect();
        let additions = encode_filters(filters, self.encoding);

        self.rewrite(
            |k| !is_reserved_key(k) && (previous.iter().any(|p| p == k) || next.iter().any(|n| n == k)),
            additions,
        );
        self.owned_keys = next;
    }

    /// Write the page; page 1 is the default and is removed from the URL
    pub fn set_page(&mut self, page: u32) {
        let additions = if page > 1 {
            vec![("page".to_string(), page.to_string())]
        } else {
            Vec::new()
        };
        self.rewrite(|k| k == "page", additions);
    }

    /// Write the sort; the default option is removed from the URL
    pub fn set_sort(&mut self, sort: &SortState) {
        let additions = if sort.is_default() {
            Vec::new()
        } else {
            vec![("sort".to_string(), sort.selected().to_string())]
        };
        self.rewrite(|k| k == "sort", additions);
    }

    /// Write the layout; the default layout is removed from the URL
    pub fn set_layout(&mut self, layout: LayoutMode) {
        let additions = if layout == LayoutMode::default() {
            Vec::new()
        } else {
            vec![("layout".to_string(), layout.to_string())]
        };
        self.rewrite(|k| k == "layout", additions);
    }

    /// Re-read state after the URL changed outside the view (history navigation)
    pub fn on_navigation(&mut self, url: Url) -> FilterState {
        self.url = url;
        let filters = self.filters();
        self.owned_keys = filters.keys().cloned().collect();
        tracing::debug!(filters = filters.len(), "url state re-synced after navigation");
        filters
    }
}
