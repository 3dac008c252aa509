//! Free-text and key-path term filtering of result records.

use benchview_protocol::ResultRecord;

use crate::keypath::KeyPath;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Case-insensitive substring of a benchmark, site, flavor, or tag name.
    Text(String),
    /// `path=value`: the rendered payload value at `path` equals `value`.
    Field { path: KeyPath, value: String },
}

impl Term {
    fn parse(raw: &str) -> Self {
        match raw.split_once('=') {
            Some((path, value)) if !path.is_empty() => Term::Field {
                path: KeyPath::new(path),
                value: value.to_owned(),
            },
            _ => Term::Text(raw.to_lowercase()),
        }
    }

    pub fn matches(&self, record: &ResultRecord) -> bool {
        match self {
            Term::Text(needle) => searchable_names(record).any(|name| name.contains(needle)),
            Term::Field { path, value } => {
                let resolved = path.resolve(&record.json);
                resolved.is_found() && resolved.display_text() == value.as_str()
            }
        }
    }
}

fn searchable_names(record: &ResultRecord) -> impl Iterator<Item = String> + '_ {
    [
        record.benchmark.to_string(),
        record.site.name.clone(),
        record.flavor.name.clone(),
    ]
    .into_iter()
    .chain(record.tag_names().map(str::to_owned))
    .map(|s| s.to_lowercase())
}

/// Conjunction of whitespace-separated terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFilter {
    terms: Vec<Term>,
}

impl TermFilter {
    pub fn parse(text: &str) -> Self {
        Self {
            terms: text.split_whitespace().map(Term::parse).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn matches(&self, record: &ResultRecord) -> bool {
        self.terms.iter().all(|t| t.matches(record))
    }
}
