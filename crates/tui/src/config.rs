//! `benchview.toml` loading.

use std::fs;
use std::path::{Path, PathBuf};

use benchview_core::model::page::DEFAULT_PER_PAGE;
use benchview_core::{BuiltinColumn, ColumnSet, KeyPath, ResultTableModel, SortSpec};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub table: TableConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Built-in columns to show, in any order.
    pub columns: Vec<BuiltinColumn>,
    /// Custom key-path columns, in display order.
    pub custom: Vec<KeyPath>,
    pub per_page: usize,
    /// `site`, `-site`, or empty for unsorted.
    pub sort: SortSpec,
    /// Offer the edit action on rows.
    pub editable: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            columns: BuiltinColumn::ALL.to_vec(),
            custom: Vec::new(),
            per_page: DEFAULT_PER_PAGE,
            sort: SortSpec::Disabled,
            editable: false,
        }
    }
}

impl TableConfig {
    pub fn model(&self) -> ResultTableModel {
        let mut columns = ColumnSet::with_builtins(self.columns.iter().copied());
        for path in &self.custom {
            columns.add_custom(path.clone());
        }
        ResultTableModel::new(columns)
            .with_sort(self.sort.clone())
            .with_editable(self.editable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    /// Log destination. Interactive mode discards logs when unset.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

/// Load `path`, or defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.table.per_page, DEFAULT_PER_PAGE);
        assert_eq!(cfg.table.columns.len(), 4);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn table_section_builds_model() {
        let cfg = parse(
            r#"
            [table]
            columns = ["site", "tags"]
            custom = ["machine.cpu.count", "score"]
            per_page = 50
            sort = "-site"
            editable = true

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.logging.format, LogFormat::Json);

        let model = cfg.table.model();
        let labels: Vec<_> = model.header().into_iter().map(|h| h.label).collect();
        assert_eq!(labels, ["Site", "Tags", "count", "score"]);
        assert_eq!(model.sort(), &SortSpec::Descending("site".into()));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse("[table]\ncolumn = [\"site\"]\n").is_err());
        assert!(parse("[table]\ncolumns = [\"uploaded\"]\n").is_err());
    }

    #[test]
    fn load_reads_file_and_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[table]\nper_page = 7").unwrap();
        let cfg = load(Some(file.path())).unwrap();
        assert_eq!(cfg.table.per_page, 7);

        let missing = Path::new("/nonexistent/benchview.toml");
        let err = load(Some(missing)).unwrap_err();
        assert!(err.to_string().contains("benchview.toml"));
        assert!(load(None).is_ok());
    }
}
