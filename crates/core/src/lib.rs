pub mod filter;
pub mod keypath;
pub mod model;
pub mod parsers;
pub mod selection;
pub mod source;
pub mod views;

pub use keypath::{KeyPath, NOT_FOUND_PLACEHOLDER, Resolved};
pub use model::{BuiltinColumn, ColumnSet, ColumnSpec, PageState, SortMode, SortSpec};
pub use selection::{Selection, SelectionSet};
pub use views::table::ResultTableModel;
