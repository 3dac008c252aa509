use serde::{Deserialize, Serialize};

/// Pagination metadata returned alongside a page of results.
///
/// `page` is 1-based, matching what the search endpoint reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

impl PageInfo {
    /// Metadata for a single page holding every one of `total` records.
    pub fn single(total: usize) -> Self {
        Self {
            page: 1,
            per_page: total.max(1),
            total,
            has_next: false,
            has_prev: false,
        }
    }

    /// Number of pages; an empty result set still has one page.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.per_page.max(1)).max(1)
    }

    /// Absolute index of the first record on this page. A page past the
    /// end counts as the last page.
    pub fn offset(&self) -> usize {
        let page = self.page.clamp(1, self.page_count());
        (page - 1).saturating_mul(self.per_page)
    }
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::single(0)
    }
}
