//! Page fetching seam between the table and whatever holds the results.

use std::cmp::Ordering;
use std::convert::Infallible;

use benchview_protocol::{ResultPage, ResultRecord};
use tracing::{debug, warn};

use crate::filter::TermFilter;
use crate::model::{PageState, SortSpec};

/// Parameters of one page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
    pub sort: SortSpec,
    pub filter: String,
}

impl PageQuery {
    pub fn new(state: &PageState, sort: &SortSpec, filter: &str) -> Self {
        Self {
            page: state.page(),
            per_page: state.per_page(),
            sort: sort.clone(),
            filter: filter.to_owned(),
        }
    }
}

/// Supplies already-sorted, already-filtered pages of results.
pub trait PageSource {
    type Error: std::error::Error;

    fn fetch(&mut self, query: &PageQuery) -> Result<ResultPage, Self::Error>;
}

/// What a renderer shows while a page request is outstanding or done.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Loading,
    Ready(ResultPage),
    Failed(String),
}

impl FetchState {
    pub fn from_result<E: std::fmt::Display>(result: Result<ResultPage, E>) -> Self {
        match result {
            Ok(page) => FetchState::Ready(page),
            Err(e) => FetchState::Failed(e.to_string()),
        }
    }

    pub fn page(&self) -> Option<&ResultPage> {
        match self {
            FetchState::Ready(page) => Some(page),
            _ => None,
        }
    }
}

/// Sort keys a [`MemorySource`] understands.
pub const SORTABLE_FIELDS: [&str; 5] = ["benchmark", "site", "flavor", "uploaded", "id"];

/// Serves pages from an in-memory result list, filtering and sorting the
/// way the search endpoint does.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<ResultRecord>,
}

impl MemorySource {
    pub fn new(records: Vec<ResultRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn sort_field(record: &ResultRecord, key: &str) -> Option<String> {
        match key {
            "benchmark" => Some(record.benchmark.to_string()),
            "site" => Some(record.site.name.clone()),
            "flavor" => Some(record.flavor.name.clone()),
            "uploaded" => record.uploaded.clone(),
            "id" => Some(record.id.clone()),
            _ => None,
        }
    }

    fn compare(a: &ResultRecord, b: &ResultRecord, key: &str) -> Ordering {
        Self::sort_field(a, key).cmp(&Self::sort_field(b, key))
    }
}

impl PageSource for MemorySource {
    type Error = Infallible;

    fn fetch(&mut self, query: &PageQuery) -> Result<ResultPage, Self::Error> {
        let filter = TermFilter::parse(&query.filter);
        let mut matching: Vec<&ResultRecord> =
            self.records.iter().filter(|r| filter.matches(r)).collect();

        match &query.sort {
            SortSpec::Disabled => {}
            SortSpec::Ascending(key) | SortSpec::Descending(key)
                if !SORTABLE_FIELDS.contains(&key.as_str()) =>
            {
                warn!(key = key.as_str(), "ignoring unknown sort key");
            }
            SortSpec::Ascending(key) => matching.sort_by(|a, b| Self::compare(a, b, key)),
            SortSpec::Descending(key) => matching.sort_by(|a, b| Self::compare(b, a, key)),
        }

        let mut state = PageState::new(query.per_page);
        state.set_total(matching.len());
        state.go_to(query.page);

        let items: Vec<ResultRecord> = matching
            .into_iter()
            .skip(state.offset())
            .take(state.per_page())
            .cloned()
            .collect();
        debug!(
            page = state.page(),
            items = items.len(),
            total = state.total(),
            sort = %query.sort,
            "served page"
        );

        Ok(ResultPage {
            items,
            pagination: state.info(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchview_protocol::SiteRef;
    use serde_json::json;

    fn source() -> MemorySource {
        let sites = ["delta", "alpha", "charlie", "bravo", "alpha"];
        MemorySource::new(
            sites
                .iter()
                .enumerate()
                .map(|(i, site)| {
                    let mut r = ResultRecord::with_json(format!("r{i}"), json!({"n": i}));
                    r.site = SiteRef {
                        id: String::new(),
                        name: (*site).into(),
                    };
                    r
                })
                .collect(),
        )
    }

    fn query(page: usize, per_page: usize, sort: SortSpec, filter: &str) -> PageQuery {
        PageQuery {
            page,
            per_page,
            sort,
            filter: filter.into(),
        }
    }

    fn ids(page: &ResultPage) -> Vec<&str> {
        page.items.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn pages_in_input_order_without_sort() {
        let mut src = source();
        let page = src.fetch(&query(2, 2, SortSpec::Disabled, "")).unwrap();
        assert_eq!(ids(&page), ["r2", "r3"]);
        assert_eq!(page.pagination.total, 5);
        assert!(page.pagination.has_next);
        assert!(page.pagination.has_prev);
    }

    #[test]
    fn ascending_sort_is_stable() {
        let mut src = source();
        let page = src
            .fetch(&query(1, 10, SortSpec::Ascending("site".into()), ""))
            .unwrap();
        assert_eq!(ids(&page), ["r1", "r4", "r3", "r2", "r0"]);
    }

    #[test]
    fn descending_sort_keeps_ties_in_order() {
        let mut src = source();
        let page = src
            .fetch(&query(1, 10, SortSpec::Descending("site".into()), ""))
            .unwrap();
        assert_eq!(ids(&page), ["r0", "r2", "r3", "r1", "r4"]);
    }

    #[test]
    fn unknown_sort_key_keeps_order() {
        let mut src = source();
        let page = src
            .fetch(&query(1, 10, SortSpec::Ascending("score".into()), ""))
            .unwrap();
        assert_eq!(ids(&page), ["r0", "r1", "r2", "r3", "r4"]);
    }

    #[test]
    fn filter_applies_before_paging() {
        let mut src = source();
        let page = src.fetch(&query(1, 1, SortSpec::Disabled, "alpha")).unwrap();
        assert_eq!(ids(&page), ["r1"]);
        assert_eq!(page.pagination.total, 2);
        assert!(page.pagination.has_next);
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let mut src = source();
        let page = src.fetch(&query(9, 2, SortSpec::Disabled, "")).unwrap();
        assert_eq!(page.pagination.page, 3);
        assert_eq!(ids(&page), ["r4"]);
    }

    #[test]
    fn fetch_state_from_result() {
        let ok: Result<ResultPage, std::fmt::Error> = Ok(ResultPage::single(Vec::new()));
        assert!(FetchState::from_result(ok).page().is_some());
        let err: Result<ResultPage, std::fmt::Error> = Err(std::fmt::Error);
        assert!(matches!(FetchState::from_result(err), FetchState::Failed(_)));
    }
}
