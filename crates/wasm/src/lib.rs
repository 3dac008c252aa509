use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use benchview_core::keypath::{self, KeyPath, Resolved};
use benchview_core::selection::Selection;
use benchview_core::{BuiltinColumn, ColumnSet, ResultTableModel, SortSpec};
use benchview_protocol::{OrderedResultRecord, ResultPage, ResultRecord};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

static PAGES: Mutex<Vec<ResultPage>> = Mutex::new(Vec::new());

fn pages() -> Result<MutexGuard<'static, Vec<ResultPage>>, JsError> {
    PAGES
        .lock()
        .map_err(|_| JsError::new("result store poisoned"))
}

/// Parse a search response (or record array / JSON lines) and keep it.
/// Returns a handle for later rendering.
#[wasm_bindgen]
pub fn parse_results(data: &[u8]) -> Result<usize, JsError> {
    let page =
        benchview_core::parsers::parse_auto(data).map_err(|e| JsError::new(&e.to_string()))?;
    let mut pages = pages()?;
    let idx = pages.len();
    pages.push(page);
    Ok(idx)
}

/// Drop every stored page; previously returned handles become invalid.
#[wasm_bindgen]
pub fn clear_results() -> Result<(), JsError> {
    pages()?.clear();
    Ok(())
}

#[derive(Debug, Serialize)]
struct Resolution<'a> {
    found: bool,
    value: Option<&'a serde_json::Value>,
    text: &'a str,
}

/// Resolve a dotted key-path against a JSON document.
///
/// Returns `{"found": bool, "value": any|null, "text": string}`; `text` is
/// the cell rendering, `"Not found!"` on a miss.
#[wasm_bindgen]
pub fn resolve_key_path(json: &str, path: &str) -> Result<String, JsError> {
    let root: serde_json::Value =
        serde_json::from_str(json).map_err(|e| JsError::new(&e.to_string()))?;
    let resolved = keypath::resolve(&root, path);
    let text = resolved.display_text();
    let out = Resolution {
        found: resolved.is_found(),
        value: match resolved {
            Resolved::Found(v) => Some(v),
            Resolved::Missing => None,
        },
        text: &text,
    };
    serde_json::to_string(&out).map_err(|e| JsError::new(&e.to_string()))
}

/// Header label for a custom column.
#[wasm_bindgen]
pub fn final_segment(path: &str) -> String {
    keypath::final_segment(path).to_owned()
}

/// Sort state after clicking the header sorting by `key`. Both sort
/// strings use `key` / `-key` / empty.
#[wasm_bindgen]
pub fn next_sort(current: &str, key: &str) -> String {
    let current: SortSpec = current.parse().unwrap_or_default();
    current.next(key).to_string()
}

/// Table state held by the caller and passed in on every render.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct TableRequest {
    columns: Vec<BuiltinColumn>,
    custom: Vec<KeyPath>,
    sort: SortSpec,
    selected: Vec<String>,
    editable: bool,
}

impl Default for TableRequest {
    fn default() -> Self {
        Self {
            columns: BuiltinColumn::ALL.to_vec(),
            custom: Vec::new(),
            sort: SortSpec::Disabled,
            selected: Vec::new(),
            editable: false,
        }
    }
}

/// Selection mirrored from the page's own id set.
struct IdSelection(HashSet<String>);

impl Selection for IdSelection {
    fn is_selected(&self, record: &ResultRecord) -> bool {
        self.0.contains(&record.id)
    }

    fn select(&mut self, record: &OrderedResultRecord) {
        self.0.insert(record.id.clone());
    }

    fn deselect(&mut self, record: &ResultRecord) {
        self.0.remove(&record.id);
    }
}

/// Render a stored page as table render commands (JSON).
#[wasm_bindgen]
pub fn render_table(handle: usize, request: &str) -> Result<String, JsError> {
    let request: TableRequest =
        serde_json::from_str(request).map_err(|e| JsError::new(&e.to_string()))?;
    let pages = pages()?;
    let page = pages
        .get(handle)
        .ok_or_else(|| JsError::new("invalid result handle"))?;

    let mut columns = ColumnSet::with_builtins(request.columns);
    for path in request.custom {
        columns.add_custom(path);
    }
    let model = ResultTableModel::new(columns)
        .with_sort(request.sort)
        .with_editable(request.editable);
    let selection = IdSelection(request.selected.into_iter().collect());

    let commands = model.render(&page.items, page.pagination.offset(), &selection);
    serde_json::to_string(&commands).map_err(|e| JsError::new(&e.to_string()))
}

/// Pagination metadata of a stored page as JSON.
#[wasm_bindgen]
pub fn get_page_info(handle: usize) -> Result<String, JsError> {
    let pages = pages()?;
    let page = pages
        .get(handle)
        .ok_or_else(|| JsError::new("invalid result handle"))?;
    serde_json::to_string(&page.pagination).map_err(|e| JsError::new(&e.to_string()))
}
