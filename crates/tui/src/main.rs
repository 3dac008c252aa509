mod app;
mod config;
mod logging;
mod renderer;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use benchview_core::keypath::resolve;
use benchview_core::parsers::parse_auto;
use benchview_core::source::{MemorySource, PageQuery, PageSource};
use benchview_core::views::chart::{ChartSpec, chart_series};
use benchview_core::{KeyPath, PageState, SelectionSet, SortSpec};
use benchview_protocol::ResultPage;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::app::App;
use crate::renderer::TableView;

#[derive(Debug, Parser)]
#[command(author, version, about = "Browse benchmark results from a search export")]
struct Args {
    /// Path to a benchview.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive result table
    View {
        /// Search response, record array, or JSON lines file
        file: PathBuf,
        /// Initial filter terms
        #[arg(long, default_value = "")]
        filter: String,
    },
    /// Print one page of the result table
    Table {
        file: PathBuf,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Overrides `table.per_page`
        #[arg(long)]
        per_page: Option<usize>,
        /// `site` ascending, `-site` descending; overrides `table.sort`
        #[arg(long, allow_hyphen_values = true)]
        sort: Option<SortSpec>,
        /// Extra custom key-path column (repeatable)
        #[arg(long = "column", short = 'c')]
        columns: Vec<String>,
        #[arg(long, default_value = "")]
        filter: String,
        #[arg(long, value_enum, default_value_t = Output::Text)]
        output: Output,
    },
    /// Resolve a key-path against a JSON document or one result's payload
    Resolve {
        file: PathBuf,
        path: String,
        /// Resolve inside the payload of the result with this id
        #[arg(long)]
        record: Option<String>,
    },
    /// Print a chart series as tab-separated values
    Chart {
        file: PathBuf,
        /// Y axis key-path
        #[arg(long)]
        y: String,
        /// X axis key-path; defaults to row position
        #[arg(long)]
        x: Option<String>,
        #[arg(long, default_value = "")]
        filter: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Output {
    Text,
    /// Render commands as JSON
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = config::load(args.config.as_deref())?;
    logging::init(&cfg.logging, matches!(args.cmd, Command::View { .. }))?;

    match args.cmd {
        Command::View { file, filter } => {
            let source = load_source(&file)?;
            let mut app = App::new(source, cfg.table.model(), cfg.table.per_page)
                .with_filter(&filter);
            renderer::render_tui(&mut app)
        }
        Command::Table {
            file,
            page,
            per_page,
            sort,
            columns,
            filter,
            output,
        } => {
            let mut model = cfg.table.model();
            for path in columns {
                model.columns_mut().add_custom(path);
            }
            if let Some(sort) = sort {
                model = model.with_sort(sort);
            }
            let mut source = load_source(&file)?;
            let query = PageQuery {
                page,
                per_page: per_page.unwrap_or(cfg.table.per_page),
                sort: model.sort().clone(),
                filter,
            };
            let page = fetch_page(&mut source, &query);
            let state = PageState::from_info(&page.pagination);
            let commands = model.render(&page.items, state.offset(), &SelectionSet::new());

            let mut out = std::io::stdout().lock();
            match output {
                Output::Text => {
                    let view = TableView::from_commands(&commands);
                    out.write_all(renderer::render_text(&view).as_bytes())?;
                    let info = state.info();
                    writeln!(
                        out,
                        "page {}/{} ({} results)",
                        info.page,
                        state.page_count(),
                        info.total
                    )?;
                }
                Output::Json => {
                    serde_json::to_writer_pretty(&mut out, &commands)?;
                    writeln!(out)?;
                }
            }
            Ok(())
        }
        Command::Resolve { file, path, record } => cmd_resolve(&file, &path, record.as_deref()),
        Command::Chart { file, y, x, filter } => {
            let spec = ChartSpec {
                x: x.map(KeyPath::new),
                y: KeyPath::new(y),
            };
            let mut source = load_source(&file)?;
            let query = PageQuery {
                page: 1,
                per_page: source.len().max(1),
                sort: SortSpec::Disabled,
                filter,
            };
            let page = fetch_page(&mut source, &query);
            let series = chart_series(&page.items, 0, &spec);
            info!(
                points = series.points.len(),
                skipped = series.skipped,
                "chart series"
            );

            let mut out = std::io::stdout().lock();
            writeln!(out, "{}\t{}", series.x_label, series.y_label)?;
            for p in &series.points {
                writeln!(out, "{}\t{}", p.x, p.y)?;
            }
            if series.skipped > 0 {
                writeln!(out, "# skipped {} results without numeric values", series.skipped)?;
            }
            Ok(())
        }
    }
}

fn load_source(path: &Path) -> Result<MemorySource> {
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let page = parse_auto(&data).with_context(|| format!("failed to parse {}", path.display()))?;
    info!(results = page.items.len(), file = %path.display(), "loaded results");
    Ok(MemorySource::new(page.items))
}

fn fetch_page(source: &mut MemorySource, query: &PageQuery) -> ResultPage {
    match source.fetch(query) {
        Ok(page) => page,
        Err(never) => match never {},
    }
}

fn cmd_resolve(path: &Path, key_path: &str, record: Option<&str>) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

    let text = match record {
        Some(id) => {
            let page = parse_auto(&data)?;
            let Some(found) = page.items.iter().find(|r| r.id == id) else {
                bail!("no result with id '{id}' in {}", path.display());
            };
            resolve(&found.json, key_path).display_text().into_owned()
        }
        None => {
            let value: serde_json::Value = serde_json::from_slice(&data)
                .with_context(|| format!("{} is not JSON", path.display()))?;
            resolve(&value, key_path).display_text().into_owned()
        }
    };

    writeln!(std::io::stdout().lock(), "{text}")?;
    Ok(())
}
