use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    TextPrimary,
    TextSecondary,
    /// Placeholder text, e.g. an unresolved custom column.
    TextMuted,

    SelectionHighlight,
    HoverHighlight,

    Background,
    Border,

    // Table
    TableRowEven,
    TableRowOdd,
    TableHeaderBackground,
    TableHeaderText,
    TableBorder,
    SortIndicator,
    TagBadge,
    ActionLink,
}
