//! Listing view: filters, sort, pagination and URL wired to the client
//!
//! A [`ListingView`] is what a listing page holds. Changing a filter or the
//! sort rewrites the URL and goes back to page 1; [`ListingView::refresh`]
//! fetches the current page. Requests run inside the view's
//! [`ViewScope`], so dropping the view discards any response still in
//! flight.

use crate::client::{ListPage, MarketClient};
use crate::core::cancel::{ScopeHandle, ViewScope};
use crate::core::entity::Listing;
use crate::core::error::Result;
use crate::core::pagination::{PaginationController, PaginationInfo};
use crate::core::query::{FilterState, FilterValue, LayoutMode, ListQuery, SortState};
use crate::presentation::{CardView, to_cards};
use crate::url_sync::UrlSynchronizer;
use reqwest::Url;
use serde_json::Value;

/// State of one listing page for listings of kind `T`
pub struct ListingView<T: Listing> {
    client: MarketClient,
    filters: FilterState,
    sort: SortState,
    layout: LayoutMode,
    pager: PaginationController,
    sync: UrlSynchronizer,
    scope: ViewScope,
    /// Page read from the URL, applied once the total is known
    requested_page: Option<u32>,
    items: Vec<T>,
    stats: Option<Value>,
}

impl<T: Listing> ListingView<T> {
    /// Open a view from the URL it was navigated to
    pub fn open(client: MarketClient, url: &str) -> Result<Self> {
        let config = client.config();
        let sync = UrlSynchronizer::from_url(url, config.array_encoding)?;
        let sort = SortState::new(
            config.sort_options_for(T::ITEM_TYPE),
            sync.sort().as_deref(),
        )?;
        let pager = PaginationController::new(0, config.items_per_page);

        tracing::debug!(resource = T::resource_name(), %url, "listing view opened");
        Ok(Self {
            filters: sync.filters(),
            layout: sync.layout(),
            requested_page: sync.page(),
            sort,
            pager,
            sync,
            client,
            scope: ViewScope::new(),
            items: Vec::new(),
            stats: None,
        })
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    pub fn pagination(&self) -> PaginationInfo {
        self.pager.info()
    }

    pub fn url(&self) -> &Url {
        self.sync.url()
    }

    /// Listings of the last successful fetch
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn stats(&self) -> Option<&Value> {
        self.stats.as_ref()
    }

    pub fn cards(&self) -> Vec<CardView> {
        to_cards(&self.items, self.client.config())
    }

    /// Handle for running extra requests in this view's scope
    pub fn scope(&self) -> ScopeHandle {
        self.scope.handle()
    }

    fn back_to_first_page(&mut self) {
        self.requested_page = None;
        self.pager.go_to_page(1);
        self.sync.set_page(1);
    }

    fn filters_changed(&mut self) {
        self.sync.apply(&self.filters);
        self.back_to_first_page();
        tracing::debug!(filters = self.filters.len(), "filters changed");
    }

    /// Set or remove (empty value) one filter
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<Option<FilterValue>>) {
        self.filters.update_one(key, value);
        self.filters_changed();
    }

    /// Replace every filter
    pub fn set_filters<I, K, V>(&mut self, filters: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Option<FilterValue>>,
    {
        self.filters.update(filters);
        self.filters_changed();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.filters_changed();
    }

    /// Select a sort option; unknown keys select the default
    pub fn select_sort(&mut self, key: &str) {
        self.sort.select(key);
        self.sync.set_sort(&self.sort);
        self.back_to_first_page();
    }

    pub fn set_layout(&mut self, layout: LayoutMode) {
        self.layout = layout;
        self.sync.set_layout(layout);
    }

    /// Go to a page, clamped to the pages known from the last fetch
    pub fn go_to_page(&mut self, page: i64) -> u32 {
        self.requested_page = None;
        let page = self.pager.go_to_page(page);
        self.sync.set_page(page);
        page
    }

    pub fn next_page(&mut self) -> u32 {
        let page = self.pager.go_to_next_page();
        self.sync.set_page(page);
        page
    }

    pub fn previous_page(&mut self) -> u32 {
        let page = self.pager.go_to_previous_page();
        self.sync.set_page(page);
        page
    }

    /// Re-read filters, sort, page and layout after history navigation
    pub fn on_navigation(&mut self, url: Url) {
        self.filters = self.sync.on_navigation(url);
        match self.sync.sort() {
            Some(key) => {
                self.sort.select(&key);
            }
            None => self.sort.reset(),
        }
        self.layout = self.sync.layout();
        self.requested_page = Some(self.sync.page().unwrap_or(1));
    }

    fn query_for(&self, page: u32) -> ListQuery {
        ListQuery::new(self.filters.clone())
            .with_sort(self.sort.selected())
            .with_page(page, self.pager.items_per_page())
    }

    /// The query the next refresh will send
    pub fn query(&self) -> ListQuery {
        self.query_for(self.requested_page.unwrap_or(self.pager.current_page()))
    }

    /// Fetch the current page
    ///
    /// A page past the end (e.g. `?page=99` in the URL) is clamped once the
    /// total is known and the last page is fetched instead. When the backend
    /// reports no total, a full page keeps the next page reachable.
    pub async fn refresh(&mut self) -> Result<&[T]> {
        let handle = self.scope.handle();
        let mut page = self
            .requested_page
            .unwrap_or(self.pager.current_page());

        let result: ListPage<T> = loop {
            let query = self.query_for(page);
            let result = self.client.list::<T>(&query, Some(&handle)).await?;
            let total = result.known_total(page, self.pager.items_per_page());
            self.pager.set_total_items(total);
            let committed = self.pager.go_to_page(page as i64);
            if committed == page || total == 0 {
                break result;
            }
            tracing::debug!(requested = page, committed, "requested page out of range");
            page = committed;
        };

        self.requested_page = None;
        self.sync.set_page(self.pager.current_page());
        self.items = result.items;
        self.stats = result.stats;
        Ok(&self.items)
    }

    /// Close the view, discarding responses still in flight
    pub fn close(self) {
        self.scope.cancel();
    }
}

impl<T: Listing> std::fmt::Debug for ListingView<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingView")
            .field("resource", &T::resource_name())
            .field("url", &self.sync.url().as_str())
            .field("filters", &self.filters)
            .field("sort", &self.sort.selected())
            .field("pager", &self.pager)
            .field("items", &self.items.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::core::session::SessionStore;
    use crate::entities::Vehicle;

    fn view(url: &str) -> ListingView<Vehicle> {
        let client = MarketClient::new(ClientConfig::default(), SessionStore::in_memory()).unwrap();
        ListingView::open(client, url).unwrap()
    }

    #[test]
    fn test_open_reads_url_state() {
        let view = view("https://carmart.example/vehicles?make=Toyota&page=3&layout=list");
        assert_eq!(
            view.filters().get_one("make"),
            Some(&FilterValue::from("Toyota"))
        );
        assert_eq!(view.layout(), LayoutMode::List);
        assert_eq!(view.query().page, Some(3));
    }

    #[test]
    fn test_sort_defaults_to_first_option() {
        let view = view("https://carmart.example/vehicles");
        assert!(view.sort().is_default());
        assert_eq!(view.query().sort.as_deref(), Some(view.sort().default_key()));
    }

    #[test]
    fn test_filter_change_resets_page_and_rewrites_url() {
        let mut view = view("https://carmart.example/vehicles?make=Toyota&page=3");

        view.set_filter("color", FilterValue::from(vec!["red", "blue"]));
        assert_eq!(view.query().page, Some(1));
        assert_eq!(view.url().query(), Some("make=Toyota&color=red%2Cblue"));

        view.set_filter("make", None::<FilterValue>);
        assert_eq!(view.url().query(), Some("color=red%2Cblue"));

        view.clear_filters();
        assert_eq!(view.url().query(), None);
    }

    #[test]
    fn test_navigation_restores_state() {
        let mut view = view("https://carmart.example/vehicles?make=Toyota");
        view.set_layout(LayoutMode::List);

        let back = Url::parse("https://carmart.example/vehicles?make=Nissan&page=2").unwrap();
        view.on_navigation(back);

        assert_eq!(
            view.filters().get_one("make"),
            Some(&FilterValue::from("Nissan"))
        );
        assert_eq!(view.layout(), LayoutMode::Grid);
        assert_eq!(view.query().page, Some(2));
    }
}
