use std::str::FromStr;

use benchview_protocol::ResultRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keypath::KeyPath;

/// Fixed columns every result table can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinColumn {
    Benchmark,
    Site,
    Flavor,
    Tags,
}

#[derive(Debug, Error)]
#[error("unknown column '{0}' (expected benchmark, site, flavor, or tags)")]
pub struct UnknownColumn(pub String);

impl BuiltinColumn {
    /// Display order of built-in columns.
    pub const ALL: [BuiltinColumn; 4] = [
        BuiltinColumn::Benchmark,
        BuiltinColumn::Site,
        BuiltinColumn::Flavor,
        BuiltinColumn::Tags,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BuiltinColumn::Benchmark => "Benchmark",
            BuiltinColumn::Site => "Site",
            BuiltinColumn::Flavor => "Flavor",
            BuiltinColumn::Tags => "Tags",
        }
    }

    /// Field name the search endpoint sorts by. Tags are not sortable.
    pub fn sort_key(self) -> Option<&'static str> {
        match self {
            BuiltinColumn::Benchmark => Some("benchmark"),
            BuiltinColumn::Site => Some("site"),
            BuiltinColumn::Flavor => Some("flavor"),
            BuiltinColumn::Tags => None,
        }
    }

    pub fn cell_text(self, record: &ResultRecord) -> String {
        match self {
            BuiltinColumn::Benchmark => record.benchmark.to_string(),
            BuiltinColumn::Site => record.site.name.clone(),
            BuiltinColumn::Flavor => record.flavor.name.clone(),
            BuiltinColumn::Tags => record.tag_names().collect::<Vec<_>>().join(", "),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for BuiltinColumn {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "benchmark" => Ok(BuiltinColumn::Benchmark),
            "site" => Ok(BuiltinColumn::Site),
            "flavor" => Ok(BuiltinColumn::Flavor),
            "tags" | "tag" => Ok(BuiltinColumn::Tags),
            _ => Err(UnknownColumn(s.to_owned())),
        }
    }
}

/// One visible table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnSpec {
    Builtin(BuiltinColumn),
    Custom(KeyPath),
}

impl ColumnSpec {
    pub fn label(&self) -> &str {
        match self {
            ColumnSpec::Builtin(b) => b.label(),
            ColumnSpec::Custom(path) => path.final_segment(),
        }
    }

    pub fn sort_key(&self) -> Option<&str> {
        match self {
            ColumnSpec::Builtin(b) => b.sort_key(),
            ColumnSpec::Custom(_) => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ColumnSpec::Custom(_))
    }
}

/// The visible schema of a table: enabled built-ins plus ordered custom
/// key-path columns. Changed only by explicit user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSet {
    enabled: [bool; 4],
    custom: Vec<KeyPath>,
}

impl ColumnSet {
    /// All built-ins enabled, no custom columns.
    pub fn new() -> Self {
        Self {
            enabled: [true; 4],
            custom: Vec::new(),
        }
    }

    /// Only the given built-ins enabled.
    pub fn with_builtins(columns: impl IntoIterator<Item = BuiltinColumn>) -> Self {
        let mut set = Self {
            enabled: [false; 4],
            custom: Vec::new(),
        };
        for c in columns {
            set.enabled[c.index()] = true;
        }
        set
    }

    pub fn is_enabled(&self, column: BuiltinColumn) -> bool {
        self.enabled[column.index()]
    }

    pub fn set_enabled(&mut self, column: BuiltinColumn, enabled: bool) {
        self.enabled[column.index()] = enabled;
    }

    /// Flip a built-in column; returns its new state.
    pub fn toggle(&mut self, column: BuiltinColumn) -> bool {
        let slot = &mut self.enabled[column.index()];
        *slot = !*slot;
        *slot
    }

    /// Append a custom column. Duplicates are ignored and return `false`.
    pub fn add_custom(&mut self, path: impl Into<KeyPath>) -> bool {
        let path = path.into();
        if self.custom.contains(&path) {
            return false;
        }
        self.custom.push(path);
        true
    }

    pub fn remove_custom(&mut self, path: &str) -> bool {
        let before = self.custom.len();
        self.custom.retain(|p| p.as_str() != path);
        self.custom.len() != before
    }

    pub fn custom(&self) -> &[KeyPath] {
        &self.custom
    }

    /// Visible columns in display order: built-ins first, then custom
    /// columns in the order they were added.
    pub fn visible(&self) -> Vec<ColumnSpec> {
        BuiltinColumn::ALL
            .into_iter()
            .filter(|c| self.is_enabled(*c))
            .map(ColumnSpec::Builtin)
            .chain(self.custom.iter().cloned().map(ColumnSpec::Custom))
            .collect()
    }
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self::new()
    }
}
