use std::borrow::Cow;

use benchview_protocol::{
    OrderedResultRecord, RenderCommand, ResultRecord, SortIndicator, TextAlign, ThemeToken,
};
use serde_json::Value;
use tracing::debug;

use crate::keypath::{KeyPath, NOT_FOUND_PLACEHOLDER, Resolved};
use crate::model::{BuiltinColumn, ColumnSet, ColumnSpec, SortSpec};
use crate::selection::Selection;

pub const EMPTY_NOTICE: &str = "No results found.";

/// A computed body cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Tags(Vec<String>),
    /// A resolved custom column. `numeric` right-aligns the cell.
    Json { text: String, numeric: bool },
    NotFound,
}

impl CellValue {
    fn from_resolved(resolved: Resolved<'_>) -> Self {
        match resolved {
            Resolved::Found(v) => CellValue::Json {
                text: resolved.display_text().into_owned(),
                numeric: matches!(v, Value::Number(_)),
            },
            Resolved::Missing => CellValue::NotFound,
        }
    }

    pub fn text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Text(t) | CellValue::Json { text: t, .. } => Cow::Borrowed(t),
            CellValue::Tags(tags) => Cow::Owned(tags.join(", ")),
            CellValue::NotFound => Cow::Borrowed(NOT_FOUND_PLACEHOLDER),
        }
    }

    pub fn color(&self) -> ThemeToken {
        match self {
            CellValue::Text(_) | CellValue::Json { .. } => ThemeToken::TextPrimary,
            CellValue::Tags(_) => ThemeToken::TagBadge,
            CellValue::NotFound => ThemeToken::TextMuted,
        }
    }

    pub fn align(&self) -> TextAlign {
        match self {
            CellValue::Json { numeric: true, .. } => TextAlign::Right,
            _ => TextAlign::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub label: String,
    pub sort_key: Option<String>,
    pub sort: SortIndicator,
    pub removable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowActions {
    pub view: bool,
    pub edit: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub record: OrderedResultRecord,
    pub selected: bool,
    pub cells: Vec<CellValue>,
    pub actions: RowActions,
}

/// Tag each record on a page with its absolute position.
///
/// Row order is input order; sorting is the page source's job.
pub fn build_rows(records: &[ResultRecord], page_offset: usize) -> Vec<OrderedResultRecord> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| OrderedResultRecord {
            record: record.clone(),
            order_index: page_offset.saturating_add(i),
        })
        .collect()
}

/// Whether every record on the page is selected. Vacuously true for an
/// empty page.
pub fn is_page_fully_selected<F>(records: &[ResultRecord], is_selected: F) -> bool
where
    F: Fn(&ResultRecord) -> bool,
{
    records.iter().all(is_selected)
}

/// The select-all toggle: deselect the whole page if it is fully selected,
/// otherwise select every record on it. Records on other pages are left
/// alone. Returns whether the page ends up selected.
pub fn toggle_page_selection<S>(
    records: &[ResultRecord],
    page_offset: usize,
    selection: &mut S,
) -> bool
where
    S: Selection + ?Sized,
{
    let rows = build_rows(records, page_offset);
    if is_page_fully_selected(records, |r| selection.is_selected(r)) {
        debug!(rows = rows.len(), page_offset, "deselecting page");
        selection.deselect_multiple(&rows);
        false
    } else {
        debug!(rows = rows.len(), page_offset, "selecting page");
        selection.select_multiple(&rows);
        true
    }
}

/// Look up a custom column in the record's payload.
pub fn resolve_custom_column_value<'a>(record: &'a ResultRecord, key_path: &KeyPath) -> Resolved<'a> {
    key_path.resolve(&record.json)
}

/// Column schema, sort state, and row computation for a result table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTableModel {
    columns: ColumnSet,
    sort: SortSpec,
    editable: bool,
}

impl ResultTableModel {
    pub fn new(columns: ColumnSet) -> Self {
        Self {
            columns,
            sort: SortSpec::Disabled,
            editable: false,
        }
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// Whether rows offer the edit action (the viewer may modify results).
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut ColumnSet {
        &mut self.columns
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// Cycle the sort for a header click: a new key sorts ascending, the
    /// current key goes ascending, descending, then off.
    pub fn set_sort(&mut self, key: &str) -> &SortSpec {
        self.sort = self.sort.next(key);
        debug!(key, sort = %self.sort, "sort changed");
        &self.sort
    }

    pub fn header(&self) -> Vec<HeaderCell> {
        self.columns
            .visible()
            .iter()
            .map(|col| {
                let sort_key = col.sort_key();
                HeaderCell {
                    label: col.label().to_owned(),
                    sort: sort_key.map_or(SortIndicator::None, |k| self.sort.indicator_for(k)),
                    sort_key: sort_key.map(str::to_owned),
                    removable: col.is_custom(),
                }
            })
            .collect()
    }

    pub fn cell(&self, record: &ResultRecord, column: &ColumnSpec) -> CellValue {
        match column {
            ColumnSpec::Builtin(BuiltinColumn::Tags) => {
                CellValue::Tags(record.tag_names().map(str::to_owned).collect())
            }
            ColumnSpec::Builtin(b) => CellValue::Text(b.cell_text(record)),
            ColumnSpec::Custom(path) => {
                CellValue::from_resolved(resolve_custom_column_value(record, path))
            }
        }
    }

    pub fn rows<S>(&self, records: &[ResultRecord], page_offset: usize, selection: &S) -> Vec<TableRow>
    where
        S: Selection + ?Sized,
    {
        let columns = self.columns.visible();
        let actions = RowActions {
            view: true,
            edit: self.editable,
        };
        build_rows(records, page_offset)
            .into_iter()
            .map(|ordered| TableRow {
                selected: selection.is_selected(&ordered),
                cells: columns.iter().map(|c| self.cell(&ordered, c)).collect(),
                record: ordered,
                actions,
            })
            .collect()
    }

    /// Produce render commands for one page.
    ///
    /// Column 0 is the selection column; visible columns follow from 1.
    pub fn render<S>(
        &self,
        records: &[ResultRecord],
        page_offset: usize,
        selection: &S,
    ) -> Vec<RenderCommand>
    where
        S: Selection + ?Sized,
    {
        let header = self.header();
        let rows = self.rows(records, page_offset, selection);

        let mut commands = Vec::with_capacity(header.len() + rows.len() * (header.len() + 3) + 4);
        commands.push(RenderCommand::BeginTable {
            id: "results".into(),
            columns: header.len() + 1,
        });
        commands.push(RenderCommand::SelectAllToggle {
            checked: !rows.is_empty() && rows.iter().all(|r| r.selected),
            enabled: !rows.is_empty(),
        });

        for (i, cell) in header.into_iter().enumerate() {
            commands.push(RenderCommand::HeaderCell {
                column: i + 1,
                color: if cell.sort == SortIndicator::None {
                    ThemeToken::TableHeaderText
                } else {
                    ThemeToken::SortIndicator
                },
                label: cell.label,
                sort_key: cell.sort_key,
                sort: cell.sort,
                removable: cell.removable,
            });
        }

        if rows.is_empty() {
            commands.push(RenderCommand::EmptyNotice {
                text: EMPTY_NOTICE.into(),
            });
        }

        for (i, row) in rows.into_iter().enumerate() {
            let background = if row.selected {
                ThemeToken::SelectionHighlight
            } else if i % 2 == 0 {
                ThemeToken::TableRowEven
            } else {
                ThemeToken::TableRowOdd
            };
            commands.push(RenderCommand::BeginRow {
                record_id: row.record.id.clone(),
                order_index: row.record.order_index,
                selected: row.selected,
                background,
            });
            for (col, cell) in row.cells.iter().enumerate() {
                commands.push(RenderCommand::Cell {
                    column: col + 1,
                    text: cell.text().into_owned(),
                    color: cell.color(),
                    align: cell.align(),
                });
            }
            commands.push(RenderCommand::Actions {
                view: row.actions.view,
                edit: row.actions.edit,
            });
            commands.push(RenderCommand::EndRow);
        }

        commands.push(RenderCommand::EndTable);
        commands
    }
}
