//! Dotted key-path lookup inside JSON result payloads.
//!
//! A key-path such as `machine.cpu.count` names a nested location by
//! successive object keys. Lookup never indexes into arrays and never fails:
//! anything that cannot be reached resolves to [`Resolved::Missing`], which
//! is kept distinct from a stored `null`.

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Text rendered for a key-path that does not resolve.
pub const NOT_FOUND_PLACEHOLDER: &str = "Not found!";

/// Outcome of resolving a key-path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// The path exists. The value may itself be `null`.
    Found(&'a Value),
    /// A segment was absent, or a non-object was reached before the end.
    Missing,
}

impl<'a> Resolved<'a> {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolved::Found(_))
    }

    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Resolved::Found(v) => Some(v),
            Resolved::Missing => None,
        }
    }

    /// Display text for a table cell.
    ///
    /// Strings render without quotes, `null`/booleans/numbers render
    /// literally, arrays and objects as compact JSON, and a miss renders as
    /// [`NOT_FOUND_PLACEHOLDER`]. Falsy values (`0`, `false`, `""`) are
    /// rendered as themselves.
    pub fn display_text(&self) -> Cow<'a, str> {
        match self {
            Resolved::Found(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Resolved::Found(v) => Cow::Owned(v.to_string()),
            Resolved::Missing => Cow::Borrowed(NOT_FOUND_PLACEHOLDER),
        }
    }

    /// Numeric view of the resolved value, used for chart axes.
    pub fn as_f64(&self) -> Option<f64> {
        self.value().and_then(Value::as_f64)
    }
}

/// A parsed dotted key-path.
///
/// Splitting is on the literal `.` with no escaping, so an empty string
/// yields one empty segment and `a..b` yields `["a", "", "b"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct KeyPath {
    raw: String,
    segments: Vec<String>,
}

impl KeyPath {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = raw.split('.').map(str::to_owned).collect();
        Self { raw, segments }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment, used as a column header or chart axis label.
    pub fn final_segment(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    pub fn resolve<'a>(&self, root: &'a Value) -> Resolved<'a> {
        resolve_segments(root, self.segments.iter().map(String::as_str))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for KeyPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for KeyPath {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for KeyPath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<KeyPath> for String {
    fn from(path: KeyPath) -> Self {
        path.raw
    }
}

/// Resolve `path` against `root` without building a [`KeyPath`].
pub fn resolve<'a>(root: &'a Value, path: &str) -> Resolved<'a> {
    resolve_segments(root, path.split('.'))
}

/// Last dot-separated segment of `path`; the empty path yields `""`.
pub fn final_segment(path: &str) -> &str {
    match path.rfind('.') {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

fn resolve_segments<'a, 's>(
    root: &'a Value,
    segments: impl IntoIterator<Item = &'s str>,
) -> Resolved<'a> {
    let mut current = root;
    for seg in segments {
        let Value::Object(map) = current else {
            return Resolved::Missing;
        };
        match map.get(seg) {
            Some(next) => current = next,
            None => return Resolved::Missing,
        }
    }
    Resolved::Found(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_first_segment() {
        assert_eq!(resolve(&json!({}), "a.b"), Resolved::Missing);
    }

    #[test]
    fn nested_number() {
        let v = json!({"a": {"b": 5}});
        assert_eq!(resolve(&v, "a.b"), Resolved::Found(&json!(5)));
    }

    #[test]
    fn stored_null_is_found() {
        let v = json!({"a": {"b": null}});
        let r = resolve(&v, "a.b");
        assert_eq!(r, Resolved::Found(&Value::Null));
        assert_eq!(r.display_text(), "null");
    }

    #[test]
    fn scalar_blocks_descent() {
        assert_eq!(resolve(&json!({"a": 5}), "a.b"), Resolved::Missing);
    }

    #[test]
    fn arrays_are_not_indexed() {
        let v = json!({"runs": [{"score": 1}]});
        assert_eq!(resolve(&v, "runs.0.score"), Resolved::Missing);
        assert!(resolve(&v, "runs").is_found());
    }

    #[test]
    fn empty_path_looks_up_empty_key() {
        assert_eq!(resolve(&json!({"a": 1}), ""), Resolved::Missing);
        let v = json!({"": "blank"});
        assert_eq!(resolve(&v, "").display_text(), "blank");
        assert_eq!(resolve(&json!(3), ""), Resolved::Missing);
    }

    #[test]
    fn resolution_is_deterministic() {
        let v = json!({"machine": {"cpu": {"count": 64}}});
        let path = KeyPath::new("machine.cpu.count");
        let first = path.resolve(&v);
        for _ in 0..3 {
            assert_eq!(path.resolve(&v), first);
        }
    }

    #[test]
    fn falsy_values_render_as_themselves() {
        let v = json!({"zero": 0, "no": false, "blank": ""});
        assert_eq!(resolve(&v, "zero").display_text(), "0");
        assert_eq!(resolve(&v, "no").display_text(), "false");
        assert_eq!(resolve(&v, "blank").display_text(), "");
        assert_eq!(resolve(&v, "other").display_text(), NOT_FOUND_PLACEHOLDER);
    }

    #[test]
    fn containers_render_as_compact_json() {
        let v = json!({"cpu": {"count": 4}, "list": [1, 2]});
        assert_eq!(resolve(&v, "cpu").display_text(), r#"{"count":4}"#);
        assert_eq!(resolve(&v, "list").display_text(), "[1,2]");
    }

    #[test]
    fn final_segment_names() {
        assert_eq!(final_segment("machine.cpu.count"), "count");
        assert_eq!(final_segment("score"), "score");
        assert_eq!(final_segment(""), "");
        assert_eq!(final_segment("trailing."), "");
        assert_eq!(KeyPath::new("a.b").final_segment(), "b");
        assert_eq!(KeyPath::new("").final_segment(), "");
    }

    #[test]
    fn segments_keep_empty_parts() {
        assert_eq!(KeyPath::new("").segments(), [""]);
        assert_eq!(KeyPath::new("a..b").segments(), ["a", "", "b"]);
    }

    #[test]
    fn key_path_deserializes_from_string() {
        let path: KeyPath = serde_json::from_value(json!("cpu.count")).unwrap();
        assert_eq!(path.segments(), ["cpu", "count"]);
        assert_eq!(serde_json::to_value(&path).unwrap(), json!("cpu.count"));
    }
}
