use benchview_core::selection::{Selection, SelectionSet};
use benchview_core::source::{FetchState, PageQuery, PageSource};
use benchview_core::views::table::{build_rows, toggle_page_selection};
use benchview_core::{PageState, ResultTableModel, SortSpec};
use benchview_protocol::{RenderCommand, ResultRecord};
use tracing::{debug, info};

/// Table controller: owns pagination, sort, filter, and selection state and
/// refetches from the page source whenever a query input changes.
pub struct App<S: PageSource> {
    source: S,
    model: ResultTableModel,
    selection: SelectionSet,
    state: PageState,
    filter: String,
    fetch: FetchState,
    cursor: usize,
}

impl<S: PageSource> App<S> {
    pub fn new(source: S, model: ResultTableModel, per_page: usize) -> Self {
        let mut app = Self {
            source,
            model,
            selection: SelectionSet::new(),
            state: PageState::new(per_page),
            filter: String::new(),
            fetch: FetchState::Loading,
            cursor: 0,
        };
        app.refresh();
        app
    }

    pub fn with_filter(mut self, filter: &str) -> Self {
        self.set_filter(filter);
        self
    }

    pub fn refresh(&mut self) {
        let query = PageQuery::new(&self.state, self.model.sort(), &self.filter);
        self.fetch = FetchState::from_result(self.source.fetch(&query));
        if let FetchState::Ready(page) = &self.fetch {
            self.state = PageState::from_info(&page.pagination);
            self.cursor = self.cursor.min(page.items.len().saturating_sub(1));
        }
        debug!(page = self.state.page(), filter = %self.filter, "refreshed");
    }

    pub fn records(&self) -> &[ResultRecord] {
        self.fetch
            .page()
            .map(|p| p.items.as_slice())
            .unwrap_or_default()
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn model(&self) -> &ResultTableModel {
        &self.model
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn render(&self) -> Vec<RenderCommand> {
        self.model
            .render(self.records(), self.state.offset(), &self.selection)
    }

    pub fn next_page(&mut self) {
        if self.state.next() {
            self.cursor = 0;
            self.refresh();
        }
    }

    pub fn prev_page(&mut self) {
        if self.state.prev() {
            self.cursor = 0;
            self.refresh();
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.records().len();
        if len == 0 {
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    /// Cycle the sort of the `column`-th visible column (0-based). Columns
    /// without a sort key are ignored. A new sort starts from page one.
    pub fn cycle_sort(&mut self, column: usize) {
        let Some(key) = self
            .model
            .header()
            .into_iter()
            .nth(column)
            .and_then(|h| h.sort_key)
        else {
            return;
        };
        let sort = self.model.set_sort(&key).clone();
        info!(sort = %sort, "sort cycled");
        self.state.go_to(1);
        self.cursor = 0;
        self.refresh();
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.trim().to_owned();
        self.state.go_to(1);
        self.cursor = 0;
        self.refresh();
    }

    pub fn toggle_cursor_row(&mut self) {
        let rows = build_rows(self.records(), self.state.offset());
        if let Some(row) = rows.get(self.cursor) {
            if self.selection.is_selected(row) {
                self.selection.deselect(row);
            } else {
                self.selection.select(row);
            }
        }
    }

    pub fn toggle_page(&mut self) {
        let Some(page) = self.fetch.page() else {
            return;
        };
        toggle_page_selection(&page.items, self.state.offset(), &mut self.selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn status_line(&self) -> String {
        let state = self.state();
        let range = match state.showing_range() {
            Some(r) => format!("{}-{} of {}", r.start(), r.end(), state.total()),
            None => "no results".to_owned(),
        };
        let sort = match self.model().sort() {
            SortSpec::Disabled => String::new(),
            spec => format!(" | sort {spec}"),
        };
        let filter = if self.filter.is_empty() {
            String::new()
        } else {
            format!(" | filter \"{}\"", self.filter)
        };
        format!(
            "page {}/{} | {range} | {} selected{sort}{filter}",
            state.page(),
            state.page_count(),
            self.selection().len(),
        )
    }
}
