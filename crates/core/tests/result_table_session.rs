//! Integration test: load a search response, serve it page by page through
//! the in-memory source, and drive the table model the way a front-end does
//! (custom columns, sort clicks, select-all, charting).

use benchview_core::model::{BuiltinColumn, ColumnSet, PageState, SortSpec};
use benchview_core::parsers::parse_auto;
use benchview_core::selection::{Selection, SelectionSet};
use benchview_core::source::{MemorySource, PageQuery, PageSource};
use benchview_core::views::chart::{ChartSpec, chart_series};
use benchview_core::views::table::{ResultTableModel, is_page_fully_selected, toggle_page_selection};
use benchview_core::NOT_FOUND_PLACEHOLDER;
use benchview_protocol::RenderCommand;

fn load() -> MemorySource {
    let data = include_bytes!("fixtures/search-results.json");
    let page = parse_auto(data).expect("fixture should parse");
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.pagination.total, 5);
    MemorySource::new(page.items)
}

fn cell_texts(commands: &[RenderCommand], column: usize) -> Vec<String> {
    commands
        .iter()
        .filter_map(|c| match c {
            RenderCommand::Cell { column: col, text, .. } if *col == column => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn paged_table_with_custom_columns() {
    let mut source = load();
    let mut columns = ColumnSet::with_builtins([BuiltinColumn::Site]);
    columns.add_custom("machine.cpu.count");
    columns.add_custom("machine.cpu.model");
    let mut model = ResultTableModel::new(columns);

    let mut state = PageState::new(2);
    model.set_sort("site");
    let query = PageQuery::new(&state, model.sort(), "");
    let page = source.fetch(&query).expect("memory source is infallible");
    state = PageState::from_info(&page.pagination);
    assert_eq!(state.page_count(), 3);

    let selection = SelectionSet::new();
    let cmds = model.render(&page.items, state.offset(), &selection);
    assert_eq!(cell_texts(&cmds, 1), ["BNL", "BNL"]);
    assert_eq!(cell_texts(&cmds, 2), ["2", "32"]);
    assert_eq!(cell_texts(&cmds, 3), [NOT_FOUND_PLACEHOLDER, NOT_FOUND_PLACEHOLDER]);

    // Second page: one CERN record stores cpu as a scalar, the DESY model is null.
    state.next();
    let page = source
        .fetch(&PageQuery::new(&state, model.sort(), ""))
        .expect("memory source is infallible");
    let cmds = model.render(&page.items, state.offset(), &selection);
    assert_eq!(cell_texts(&cmds, 1), ["CERN", "CERN"]);
    assert_eq!(cell_texts(&cmds, 2), ["8", NOT_FOUND_PLACEHOLDER]);

    let order: Vec<_> = cmds
        .iter()
        .filter_map(|c| match c {
            RenderCommand::BeginRow { order_index, .. } => Some(*order_index),
            _ => None,
        })
        .collect();
    assert_eq!(order, [2, 3]);

    state.next();
    let page = source
        .fetch(&PageQuery::new(&state, model.sort(), ""))
        .expect("memory source is infallible");
    let cmds = model.render(&page.items, state.offset(), &selection);
    assert_eq!(cell_texts(&cmds, 1), ["DESY"]);
    assert_eq!(cell_texts(&cmds, 3), ["null"]);
    assert!(!state.has_next());
}

#[test]
fn select_all_is_scoped_to_each_page() {
    let mut source = load();
    let model = ResultTableModel::new(ColumnSet::new());
    let mut selection = SelectionSet::new();
    let mut state = PageState::new(2);
    state.set_total(source.len());

    let first = source
        .fetch(&PageQuery::new(&state, &SortSpec::Disabled, ""))
        .expect("memory source is infallible");
    toggle_page_selection(&first.items, state.offset(), &mut selection);

    state.next();
    let second = source
        .fetch(&PageQuery::new(&state, &SortSpec::Disabled, ""))
        .expect("memory source is infallible");
    assert!(!is_page_fully_selected(&second.items, |r| selection.is_selected(r)));
    toggle_page_selection(&second.items, state.offset(), &mut selection);
    assert_eq!(selection.len(), 4);
    assert_eq!(selection.order_index("3f0c1a52-0004"), Some(3));

    // Untoggling page two leaves page one selected.
    toggle_page_selection(&second.items, state.offset(), &mut selection);
    assert_eq!(
        selection.ids_in_order(),
        ["3f0c1a52-0001", "3f0c1a52-0002"]
    );

    let cmds = model.render(&first.items, 0, &selection);
    assert!(cmds.contains(&RenderCommand::SelectAllToggle {
        checked: true,
        enabled: true
    }));
}

#[test]
fn filter_then_sort_descending() {
    let mut source = load();
    let mut state = PageState::new(10);
    state.set_total(source.len());
    let sort: SortSpec = "-uploaded".parse().unwrap_or_default();

    let page = source
        .fetch(&PageQuery::new(&state, &sort, "nightly"))
        .expect("memory source is infallible");
    let ids: Vec<_> = page.items.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["3f0c1a52-0003", "3f0c1a52-0001"]);
}

#[test]
fn chart_of_score_against_cpu_count() {
    let mut source = load();
    let state = PageState::new(10);
    let page = source
        .fetch(&PageQuery::new(&state, &SortSpec::Disabled, ""))
        .expect("memory source is infallible");

    let spec = ChartSpec {
        x: Some("machine.cpu.count".into()),
        y: "score".into(),
    };
    let series = chart_series(&page.items, state.offset(), &spec);
    assert_eq!(series.x_label, "count");
    let pairs: Vec<_> = series.points.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(pairs, [(8.0, 412.5), (16.0, 801.0), (32.0, 1620.25)]);
    assert_eq!(series.skipped, 2);
}
