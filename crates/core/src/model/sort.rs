use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use benchview_protocol::SortIndicator;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    Disabled,
    Ascending,
    Descending,
}

/// Requested ordering of a result search.
///
/// Disabled carries no key. The key names a field the search endpoint
/// knows how to sort by; sorting itself happens in the page source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SortSpec {
    #[default]
    Disabled,
    Ascending(String),
    Descending(String),
}

impl SortSpec {
    pub fn key(&self) -> Option<&str> {
        match self {
            SortSpec::Disabled => None,
            SortSpec::Ascending(k) | SortSpec::Descending(k) => Some(k),
        }
    }

    pub fn mode(&self) -> SortMode {
        match self {
            SortSpec::Disabled => SortMode::Disabled,
            SortSpec::Ascending(_) => SortMode::Ascending,
            SortSpec::Descending(_) => SortMode::Descending,
        }
    }

    /// State after the user clicks the header sorting by `key`.
    ///
    /// A different key starts ascending; the same key goes ascending,
    /// descending, then off.
    pub fn next(&self, key: &str) -> SortSpec {
        match self {
            SortSpec::Ascending(current) if current == key => SortSpec::Descending(key.to_owned()),
            SortSpec::Descending(current) if current == key => SortSpec::Disabled,
            _ => SortSpec::Ascending(key.to_owned()),
        }
    }

    /// Indicator for the header cell sorting by `key`.
    pub fn indicator_for(&self, key: &str) -> SortIndicator {
        match self {
            SortSpec::Ascending(k) if k == key => SortIndicator::Ascending,
            SortSpec::Descending(k) if k == key => SortIndicator::Descending,
            _ => SortIndicator::None,
        }
    }
}

/// `site` is ascending, `-site` descending, and the empty string disabled.
impl FromStr for SortSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (key, descending) = match s.strip_prefix('-') {
            Some(rest) => (rest.trim(), true),
            None => (s, false),
        };
        // A key never starts with `-`, so `--site` names nothing.
        if key.is_empty() || key.starts_with('-') {
            return Ok(SortSpec::Disabled);
        }
        Ok(if descending {
            SortSpec::Descending(key.to_owned())
        } else {
            SortSpec::Ascending(key.to_owned())
        })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortSpec::Disabled => Ok(()),
            SortSpec::Ascending(k) => f.write_str(k),
            SortSpec::Descending(k) => write!(f, "-{k}"),
        }
    }
}

impl From<String> for SortSpec {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(spec) => spec,
            Err(never) => match never {},
        }
    }
}

impl From<SortSpec> for String {
    fn from(spec: SortSpec) -> Self {
        spec.to_string()
    }
}
