pub mod commands;
pub mod record;
pub mod theme;
pub mod types;

pub use commands::{RenderCommand, SortIndicator, TextAlign};
pub use record::{
    BenchmarkRef, FlavorRef, OrderedResultRecord, ResultPage, ResultRecord, SiteRef, TagRef,
};
pub use theme::ThemeToken;
pub use types::PageInfo;
