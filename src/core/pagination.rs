//! Pagination state and page math for listing views

use serde::Serialize;
use std::fmt;

/// Derived pagination metadata for the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    /// Current page number (starts at 1)
    pub current_page: u32,

    /// Number of items per page
    pub items_per_page: u32,

    /// Total number of items (after filters)
    pub total_items: u64,

    /// Total number of pages
    pub total_pages: u32,

    /// Whether there is a next page
    pub has_next_page: bool,

    /// Whether there is a previous page
    pub has_previous_page: bool,

    /// 1-based index of the first item shown (0 when empty)
    pub start_item: u64,

    /// 1-based index of the last item shown (0 when empty)
    pub end_item: u64,
}

impl PaginationInfo {
    pub fn new(current_page: u32, items_per_page: u32, total_items: u64) -> Self {
        // Ensure limit is at least 1 to avoid division by zero
        let items_per_page = items_per_page.max(1);
        let total_pages = total_pages(total_items, items_per_page);
        let current_page = current_page.clamp(1, total_pages.max(1));

        let (start_item, end_item) = if total_items == 0 {
            (0, 0)
        } else {
            let start = (current_page as u64 - 1) * items_per_page as u64 + 1;
            let end = (current_page as u64 * items_per_page as u64).min(total_items);
            (start, end)
        };

        Self {
            current_page,
            items_per_page,
            total_items,
            total_pages,
            has_next_page: current_page < total_pages,
            has_previous_page: current_page > 1,
            start_item,
            end_item,
        }
    }
}

/// `ceil(total_items / items_per_page)`, saturating at `u32::MAX`
pub fn total_pages(total_items: u64, items_per_page: u32) -> u32 {
    let pages = total_items.div_ceil(items_per_page.max(1) as u64);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

type PageChangeCallback = Box<dyn FnMut(u32) + Send>;

/// Owns the current page and clamps every navigation into range
///
/// # Example
/// ```rust,ignore
/// let mut pager = PaginationController::new(25, 10)
///     .on_page_change(|page| tracing::info!(page, "page changed"));
///
/// assert_eq!(pager.go_to_page(99), 3); // clamped, callback receives 3
/// ```
pub struct PaginationController {
    current_page: u32,
    items_per_page: u32,
    total_items: u64,
    on_change: Option<PageChangeCallback>,
}

impl PaginationController {
    pub fn new(total_items: u64, items_per_page: u32) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
            total_items,
            on_change: None,
        }
    }

    /// Start on a given page (e.g., read from the URL); the value is clamped
    pub fn with_initial_page(mut self, page: i64) -> Self {
        self.current_page = self.clamp(page);
        self
    }

    /// Register the notification invoked with every committed page
    pub fn on_page_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(u32) + Send + 'static,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_items, self.items_per_page)
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn info(&self) -> PaginationInfo {
        PaginationInfo::new(self.current_page, self.items_per_page, self.total_items)
    }

    fn clamp(&self, page: i64) -> u32 {
        let last = self.total_pages().max(1) as i64;
        page.clamp(1, last) as u32
    }

    fn commit(&mut self, page: u32) {
        self.current_page = page;
        tracing::debug!(page, total_pages = self.total_pages(), "page committed");
        if let Some(callback) = self.on_change.as_mut() {
            callback(page);
        }
    }

    /// Go to `page`, clamped into `[1, total_pages]`
    ///
    /// The callback receives the clamped page, which is also returned.
    pub fn go_to_page(&mut self, page: i64) -> u32 {
        let page = self.clamp(page);
        self.commit(page);
        page
    }

    /// Advance one page; no-op on the last page
    pub fn go_to_next_page(&mut self) -> u32 {
        if self.has_next_page() {
            self.commit(self.current_page + 1);
        }
        self.current_page
    }

    /// Go back one page; no-op on the first page
    pub fn go_to_previous_page(&mut self) -> u32 {
        if self.has_previous_page() {
            self.commit(self.current_page - 1);
        }
        self.current_page
    }

    /// Update the total after a fetch, re-clamping if the result set shrank
    pub fn set_total_items(&mut self, total_items: u64) {
        self.total_items = total_items;
        let clamped = self.clamp(self.current_page as i64);
        if clamped != self.current_page {
            self.commit(clamped);
        }
    }

    /// Change the page size; goes back to the first page
    pub fn set_items_per_page(&mut self, items_per_page: u32) {
        self.items_per_page = items_per_page.max(1);
        if self.current_page != 1 {
            self.commit(1);
        }
    }

    /// Page numbers to render in a pager, centered on the current page
    pub fn page_numbers(&self, window: u32) -> Vec<u32> {
        let total = self.total_pages();
        if total == 0 {
            return Vec::new();
        }
        let window = window.clamp(1, total);
        let half = window / 2;
        let start = self
            .current_page
            .saturating_sub(half)
            .clamp(1, total - window + 1);
        (start..start + window).collect()
    }
}

impl fmt::Debug for PaginationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationController")
            .field("current_page", &self.current_page)
            .field("items_per_page", &self.items_per_page)
            .field("total_items", &self.total_items)
            .finish_non_exhaustive()
    }
}
