pub mod column;
pub mod page;
pub mod sort;

pub use column::{BuiltinColumn, ColumnSet, ColumnSpec, UnknownColumn};
pub use page::PageState;
pub use sort::{SortMode, SortSpec};
