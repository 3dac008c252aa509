use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use benchview_core::source::{FetchState, PageSource};
use benchview_protocol::{RenderCommand, SortIndicator, TextAlign, ThemeToken};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::app::App;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::TextSecondary => Color::Gray,
        ThemeToken::TextMuted => Color::DarkGray,
        ThemeToken::SelectionHighlight => Color::Rgb(20, 60, 30),
        ThemeToken::HoverHighlight => Color::LightYellow,
        ThemeToken::Background => Color::Black,
        ThemeToken::Border => Color::DarkGray,
        ThemeToken::TableRowEven => Color::Black,
        ThemeToken::TableRowOdd => Color::Rgb(20, 20, 20),
        ThemeToken::TableHeaderBackground => Color::DarkGray,
        ThemeToken::TableHeaderText => Color::White,
        ThemeToken::TableBorder => Color::DarkGray,
        ThemeToken::SortIndicator => Color::LightYellow,
        ThemeToken::TagBadge => Color::Cyan,
        ThemeToken::ActionLink => Color::LightBlue,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub label: String,
    pub sort: SortIndicator,
    pub color: ThemeToken,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    pub text: String,
    pub color: ThemeToken,
    pub align: TextAlign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub order_index: usize,
    pub selected: bool,
    pub background: ThemeToken,
    pub cells: Vec<CellView>,
    pub actions: Option<(bool, bool)>,
}

/// Table layout reassembled from a render command stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub all_selected: bool,
    pub header: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    pub notice: Option<String>,
}

impl TableView {
    pub fn from_commands(commands: &[RenderCommand]) -> Self {
        let mut view = TableView::default();
        for cmd in commands {
            match cmd {
                RenderCommand::SelectAllToggle { checked, .. } => view.all_selected = *checked,
                RenderCommand::HeaderCell {
                    label, sort, color, ..
                } => view.header.push(HeaderView {
                    label: label.clone(),
                    sort: *sort,
                    color: *color,
                }),
                RenderCommand::BeginRow {
                    order_index,
                    selected,
                    background,
                    ..
                } => view.rows.push(RowView {
                    order_index: *order_index,
                    selected: *selected,
                    background: *background,
                    cells: Vec::new(),
                    actions: None,
                }),
                RenderCommand::Cell {
                    text, color, align, ..
                } => {
                    if let Some(row) = view.rows.last_mut() {
                        row.cells.push(CellView {
                            text: text.clone(),
                            color: *color,
                            align: *align,
                        });
                    }
                }
                RenderCommand::Actions { view: v, edit } => {
                    if let Some(row) = view.rows.last_mut() {
                        row.actions = Some((*v, *edit));
                    }
                }
                RenderCommand::EmptyNotice { text } => view.notice = Some(text.clone()),
                RenderCommand::BeginTable { .. }
                | RenderCommand::EndRow
                | RenderCommand::EndTable => {}
            }
        }
        view
    }

    fn header_labels(&self) -> Vec<String> {
        self.header
            .iter()
            .map(|h| format!("{}{}", h.label, h.sort.glyph()))
            .collect()
    }
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

fn actions_text(actions: Option<(bool, bool)>) -> &'static str {
    match actions {
        Some((true, true)) => "view edit",
        Some((true, false)) => "view",
        Some((false, true)) => "edit",
        _ => "",
    }
}

/// Plain-text rendering of one page, column-aligned.
pub fn render_text(view: &TableView) -> String {
    let mut grid: Vec<Vec<(String, TextAlign)>> = Vec::with_capacity(view.rows.len() + 1);

    let mut header = vec![
        (checkbox(view.all_selected).to_owned(), TextAlign::Left),
        ("#".to_owned(), TextAlign::Right),
    ];
    header.extend(view.header_labels().into_iter().map(|l| (l, TextAlign::Left)));
    header.push(("Actions".to_owned(), TextAlign::Left));
    grid.push(header);

    for row in &view.rows {
        let mut line = vec![
            (checkbox(row.selected).to_owned(), TextAlign::Left),
            (row.order_index.to_string(), TextAlign::Right),
        ];
        line.extend(row.cells.iter().map(|c| (c.text.clone(), c.align)));
        line.push((actions_text(row.actions).to_owned(), TextAlign::Left));
        grid.push(line);
    }

    let columns = grid.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            grid.iter()
                .filter_map(|r| r.get(i))
                .map(|(t, _)| t.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for line in &grid {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|((text, align), w)| match align {
                TextAlign::Right => format!("{text:>w$}"),
                TextAlign::Center => format!("{text:^w$}"),
                TextAlign::Left => format!("{text:<w$}"),
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    if let Some(notice) = &view.notice {
        out.push_str(notice);
        out.push('\n');
    }
    out
}

fn to_alignment(align: TextAlign) -> Alignment {
    match align {
        TextAlign::Left => Alignment::Left,
        TextAlign::Center => Alignment::Center,
        TextAlign::Right => Alignment::Right,
    }
}

fn build_table(view: &TableView) -> Table<'static> {
    let header_style = Style::default()
        .fg(theme_to_color(ThemeToken::TableHeaderText))
        .bg(theme_to_color(ThemeToken::TableHeaderBackground))
        .add_modifier(Modifier::BOLD);

    let mut header_cells = vec![
        Cell::from(checkbox(view.all_selected)),
        Cell::from(Line::from("#").alignment(Alignment::Right)),
    ];
    header_cells.extend(view.header.iter().map(|h| {
        Cell::from(format!("{}{}", h.label, h.sort.glyph()))
            .style(Style::default().fg(theme_to_color(h.color)))
    }));
    header_cells.push(Cell::from("Actions"));

    let rows: Vec<Row> = view
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                Cell::from(checkbox(row.selected)),
                Cell::from(Line::from(row.order_index.to_string()).alignment(Alignment::Right)),
            ];
            cells.extend(row.cells.iter().map(|c| {
                Cell::from(Line::from(c.text.clone()).alignment(to_alignment(c.align)))
                    .style(Style::default().fg(theme_to_color(c.color)))
            }));
            cells.push(
                Cell::from(actions_text(row.actions))
                    .style(Style::default().fg(theme_to_color(ThemeToken::ActionLink))),
            );
            Row::new(cells).style(Style::default().bg(theme_to_color(row.background)))
        })
        .collect();

    let mut widths = vec![Constraint::Length(3), Constraint::Length(6)];
    widths.extend(view.header.iter().map(|_| Constraint::Fill(1)));
    widths.push(Constraint::Length(9));

    Table::new(rows, widths)
        .header(Row::new(header_cells).style(header_style))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme_to_color(ThemeToken::TableBorder))),
        )
}

const HELP: &str = "↑↓ move | ←→ page | 1-9 sort | space select | a page | c clear | / filter | q quit";

pub fn render_tui<S: PageSource>(app: &mut App<S>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<S: PageSource>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App<S>,
) -> Result<()> {
    // Some(text) while the filter prompt is open.
    let mut filter_input: Option<String> = None;

    loop {
        let view = TableView::from_commands(&app.render());
        let status = match (&filter_input, app.fetch_state()) {
            (Some(text), _) => format!(" filter: {text}_"),
            (None, FetchState::Failed(err)) => format!(" error: {err}"),
            (None, FetchState::Loading) => " loading…".to_owned(),
            (None, FetchState::Ready(_)) => format!(" {}", app.status_line()),
        };

        terminal.draw(|frame| {
            let [title_area, body_area, status_area] = Layout::vertical([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .areas(frame.area());

            frame.render_widget(
                Paragraph::new(format!(" benchview | {HELP}"))
                    .style(Style::default().fg(Color::White).bg(Color::DarkGray)),
                title_area,
            );

            if let Some(notice) = &view.notice {
                frame.render_widget(
                    Paragraph::new(notice.as_str())
                        .style(Style::default().fg(theme_to_color(ThemeToken::TextMuted)))
                        .block(Block::default().borders(Borders::ALL)),
                    body_area,
                );
            } else {
                let mut state = TableState::default().with_selected(Some(app.cursor()));
                frame.render_stateful_widget(build_table(&view), body_area, &mut state);
            }

            frame.render_widget(
                Paragraph::new(status.as_str()).style(Style::default().fg(Color::Gray)),
                status_area,
            );
        })?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if let Some(text) = filter_input.as_mut() {
            match key.code {
                KeyCode::Esc => filter_input = None,
                KeyCode::Enter => {
                    let text = std::mem::take(text);
                    filter_input = None;
                    app.set_filter(&text);
                }
                KeyCode::Backspace => {
                    text.pop();
                }
                KeyCode::Char(c) => text.push(c),
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
            KeyCode::Left | KeyCode::Char('p') => app.prev_page(),
            KeyCode::Right | KeyCode::Char('n') => app.next_page(),
            KeyCode::Char(' ') => app.toggle_cursor_row(),
            KeyCode::Char('a') => app.toggle_page(),
            KeyCode::Char('c') => app.clear_selection(),
            KeyCode::Char('r') => app.refresh(),
            KeyCode::Char('/') => filter_input = Some(app.filter().to_owned()),
            KeyCode::Char(d @ '1'..='9') => {
                if let Some(n) = d.to_digit(10) {
                    app.cycle_sort(n as usize - 1);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchview_core::{ColumnSet, ResultTableModel, SelectionSet, Selection};
    use benchview_core::views::table::build_rows;
    use benchview_protocol::ResultRecord;
    use serde_json::json;

    fn commands() -> Vec<RenderCommand> {
        let records = vec![
            ResultRecord::with_json("r1", json!({"cpu": {"count": 4}})),
            ResultRecord::with_json("r2", json!({"cpu": {"count": 16}})),
        ];
        let mut columns = ColumnSet::with_builtins([]);
        columns.add_custom("cpu.count");
        columns.add_custom("gpu");
        let model = ResultTableModel::new(columns);
        let mut selection = SelectionSet::new();
        selection.select(&build_rows(&records, 10)[0]);
        model.render(&records, 10, &selection)
    }

    #[test]
    fn view_collects_rows_and_cells() {
        let view = TableView::from_commands(&commands());
        assert!(!view.all_selected);
        assert_eq!(view.header.len(), 2);
        assert_eq!(view.rows.len(), 2);
        assert!(view.rows[0].selected);
        assert_eq!(view.rows[1].order_index, 11);
        assert_eq!(view.rows[1].cells[0].text, "16");
        assert_eq!(view.rows[1].cells[1].color, ThemeToken::TextMuted);
        assert_eq!(view.rows[0].actions, Some((true, false)));
    }

    #[test]
    fn text_output_is_aligned() {
        let text = render_text(&TableView::from_commands(&commands()));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("[ ]"));
        assert!(lines[0].contains("count"));
        assert!(lines[1].starts_with("[x]  10"));
        assert!(lines[2].contains("16"));
        assert!(lines[2].contains("Not found!"));
    }

    #[test]
    fn empty_page_prints_notice() {
        let model = ResultTableModel::default();
        let cmds = model.render(&[], 0, &SelectionSet::new());
        let text = render_text(&TableView::from_commands(&cmds));
        assert!(text.ends_with("No results found.\n"));
    }
}
