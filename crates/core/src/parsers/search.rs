use benchview_protocol::{PageInfo, ResultPage, ResultRecord};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected an object with \"items\" or an array of results")]
    Shape,
}

/// Body of a search response.
///
/// Pagination fields may sit at the top level next to `items` or be nested
/// under `pagination`; anything missing is derived from the items.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<ResultRecord>,
    #[serde(default)]
    pagination: Option<PageInfo>,
    #[serde(default)]
    page: Option<usize>,
    #[serde(default)]
    per_page: Option<usize>,
    #[serde(default)]
    total: Option<usize>,
    #[serde(default)]
    has_next: Option<bool>,
    #[serde(default)]
    has_prev: Option<bool>,
}

impl SearchResponse {
    fn into_page(self) -> ResultPage {
        if let Some(pagination) = self.pagination {
            return ResultPage {
                items: self.items,
                pagination,
            };
        }

        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(self.items.len()).max(1);
        let offset = (page - 1).saturating_mul(per_page);
        let total = self
            .total
            .unwrap_or(offset.saturating_add(self.items.len()));
        ResultPage {
            pagination: PageInfo {
                page,
                per_page,
                total,
                has_next: self.has_next.unwrap_or(page.saturating_mul(per_page) < total),
                has_prev: self.has_prev.unwrap_or(page > 1),
            },
            items: self.items,
        }
    }
}

/// Parse a search response body.
pub fn parse_search_response(data: &[u8]) -> Result<ResultPage, SearchParseError> {
    let value: Value = serde_json::from_slice(data)?;
    page_from_value(value)
}

/// Interpret an already-decoded body: an object carrying `items`, or a
/// bare array treated as one complete page.
pub fn page_from_value(value: Value) -> Result<ResultPage, SearchParseError> {
    match value {
        Value::Object(ref obj) if obj.contains_key("items") => {
            let response: SearchResponse = serde_json::from_value(value)?;
            Ok(response.into_page())
        }
        Value::Array(_) => {
            let items: Vec<ResultRecord> = serde_json::from_value(value)?;
            Ok(ResultPage::single(items))
        }
        _ => Err(SearchParseError::Shape),
    }
}
