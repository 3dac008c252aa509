use benchview_protocol::{ResultPage, ResultRecord};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonlParseError {
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        source: serde_json::Error,
    },
    #[error("no result lines found")]
    Empty,
}

/// Parse newline-delimited results, one record object per line.
///
/// Blank lines are skipped. The whole file becomes a single page.
pub fn parse_jsonl(data: &[u8]) -> Result<ResultPage, JsonlParseError> {
    let text = std::str::from_utf8(data)?;
    let mut items = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line_text = line.trim();
        if line_text.is_empty() {
            continue;
        }
        let record: ResultRecord = serde_json::from_str(line_text)
            .map_err(|source| JsonlParseError::Line { line: i + 1, source })?;
        items.push(record);
    }

    if items.is_empty() {
        return Err(JsonlParseError::Empty);
    }
    Ok(ResultPage::single(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lines_and_skips_blanks() {
        let input = b"{\"id\": \"a\", \"json\": {\"x\": 1}}\n\n{\"id\": \"b\"}\n";
        let page = parse_jsonl(input).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].id, "b");
    }

    #[test]
    fn reports_failing_line() {
        let input = b"{\"id\": \"a\"}\n{\"id\": \n";
        match parse_jsonl(input) {
            Err(JsonlParseError::Line { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_input_errors() {
        assert!(matches!(parse_jsonl(b"\n\n"), Err(JsonlParseError::Empty)));
    }
}
