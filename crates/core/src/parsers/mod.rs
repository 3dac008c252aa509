pub mod jsonl;
pub mod search;

use benchview_protocol::ResultPage;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("search response: {0}")]
    Search(#[from] search::SearchParseError),
    #[error("json lines: {0}")]
    Jsonl(#[from] jsonl::JsonlParseError),
    #[error("single result: {0}")]
    Record(#[from] serde_json::Error),
    #[error("unable to detect format")]
    UnknownFormat,
}

/// Auto-detect the result file layout and parse it into a page.
///
/// Detection strategy:
/// 1. A JSON document: an object with `items` (search response), a
///    top-level array of records, or one record object carrying `id`.
/// 2. Otherwise newline-delimited JSON when the first non-blank line
///    starts an object.
pub fn parse_auto(data: &[u8]) -> Result<ResultPage, ParseError> {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let looks_like_page = value.is_array()
            || value
                .as_object()
                .is_some_and(|obj| obj.contains_key("items"));
        if looks_like_page {
            let page = search::page_from_value(value)?;
            debug!(
                items = page.items.len(),
                total = page.pagination.total,
                "parsed search response"
            );
            return Ok(page);
        }
        if value.get("id").is_some_and(serde_json::Value::is_string) {
            let record = serde_json::from_value(value)?;
            return Ok(ResultPage::single(vec![record]));
        }
        return Err(ParseError::UnknownFormat);
    }

    if let Ok(text) = std::str::from_utf8(data)
        && text
            .lines()
            .find(|l| !l.trim().is_empty())
            .is_some_and(|l| l.trim_start().starts_with('{'))
    {
        let page = jsonl::parse_jsonl(data)?;
        debug!(items = page.items.len(), "parsed json lines");
        return Ok(page);
    }

    Err(ParseError::UnknownFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_search_response() {
        let page = parse_auto(br#"{"items": [{"id": "a"}], "total": 1}"#).unwrap();
        assert_eq!(page.items[0].id, "a");
    }

    #[test]
    fn detects_array() {
        let page = parse_auto(br#"[{"id": "a"}, {"id": "b"}]"#).unwrap();
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn detects_json_lines() {
        let page = parse_auto(b"{\"id\": \"a\"}\n{\"id\": \"b\"}\n").unwrap();
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn single_record_object() {
        let page = parse_auto(br#"{"id": "solo", "json": {"score": 2}}"#).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.total, 1);
    }

    #[test]
    fn unknown_shapes() {
        assert!(matches!(
            parse_auto(br#"{"name": "lonely"}"#),
            Err(ParseError::UnknownFormat)
        ));
        assert!(matches!(parse_auto(b"id,site\n"), Err(ParseError::UnknownFormat)));
    }
}
