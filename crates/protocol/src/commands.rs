use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;

/// A single, stateless table render instruction.
///
/// The core emits a `Vec<RenderCommand>` for each table pass. Renderers
/// consume the list sequentially; every command carries all the data it
/// needs, so no renderer re-derives sort, selection, or lookup state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Start a table with the given number of columns, including the
    /// leading selection column.
    BeginTable {
        id: String,
        columns: usize,
    },

    /// The select-all checkbox heading the selection column.
    SelectAllToggle { checked: bool, enabled: bool },

    /// One header cell. `sort_key` is set when clicking it should cycle
    /// the sort; `removable` marks user-added custom columns.
    HeaderCell {
        column: usize,
        label: String,
        sort_key: Option<String>,
        sort: SortIndicator,
        removable: bool,
        color: ThemeToken,
    },

    /// Begin a body row for the record at absolute position `order_index`.
    BeginRow {
        record_id: String,
        order_index: usize,
        selected: bool,
        background: ThemeToken,
    },

    /// One body cell.
    Cell {
        column: usize,
        text: String,
        color: ThemeToken,
        align: TextAlign,
    },

    /// Per-row actions (view payload, edit tags).
    Actions { view: bool, edit: bool },

    EndRow,

    /// Placeholder shown instead of rows when the page is empty.
    EmptyNotice { text: String },

    EndTable,
}

/// Sort state shown next to a header label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortIndicator {
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortIndicator {
    /// Glyph appended to a header label.
    pub fn glyph(self) -> &'static str {
        match self {
            SortIndicator::None => "",
            SortIndicator::Ascending => "▲",
            SortIndicator::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_round_trip_through_json() {
        let cmd = RenderCommand::HeaderCell {
            column: 1,
            label: "Site".into(),
            sort_key: Some("site".into()),
            sort: SortIndicator::Descending,
            removable: false,
            color: ThemeToken::TableHeaderText,
        };
        let text = serde_json::to_string(&cmd).unwrap();
        let back: RenderCommand = serde_json::from_str(&text).unwrap();
        assert_eq!(back, cmd);
    }
}
