use std::ops::RangeInclusive;

use benchview_protocol::PageInfo;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: usize = 20;

/// Pagination state owned by a single table controller.
///
/// `page` is 1-based and always within `1..=page_count()`. Serialized as
/// its `PageInfo`, and deserialized through [`PageState::from_info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PageInfo", into = "PageInfo")]
pub struct PageState {
    page: usize,
    per_page: usize,
    total: usize,
}

impl PageState {
    pub fn new(per_page: usize) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            total: 0,
        }
    }

    /// Adopt the metadata reported with a fetched page.
    pub fn from_info(info: &PageInfo) -> Self {
        let mut state = Self::new(info.per_page);
        state.total = info.total;
        state.go_to(info.page);
        state
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Absolute index of the first row on the current page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.per_page
    }

    /// Number of pages; an empty result set still has one (empty) page.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.per_page).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Advance one page; returns whether the page changed.
    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.has_prev() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`, clamped into range.
    pub fn go_to(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count());
    }

    /// Change the page size, staying on the page that holds the first
    /// record currently visible.
    pub fn set_per_page(&mut self, per_page: usize) {
        let first = self.offset();
        self.per_page = per_page.max(1);
        self.go_to(first / self.per_page + 1);
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.go_to(self.page);
    }

    /// 1-based inclusive range of visible records, `None` when empty.
    pub fn showing_range(&self) -> Option<RangeInclusive<usize>> {
        if self.offset() >= self.total {
            return None;
        }
        let end = self.offset().saturating_add(self.per_page).min(self.total);
        Some(self.offset() + 1..=end)
    }

    /// Metadata describing the current page.
    pub fn info(&self) -> PageInfo {
        PageInfo {
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            has_next: self.has_next(),
            has_prev: self.has_prev(),
        }
    }
}

impl From<PageInfo> for PageState {
    fn from(info: PageInfo) -> Self {
        Self::from_info(&info)
    }
}

impl From<PageState> for PageInfo {
    fn from(state: PageState) -> Self {
        state.info()
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}
