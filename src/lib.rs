//! # tabstat
//!
//! In-memory tables loaded from delimited text, with column projection,
//! null-row filtering and descriptive statistics.
//!
//! - [`tokenizer`]: line and field splitting
//! - [`loader`]: whole-file reader building a [`table::Table`]
//! - [`table`]: row-major cell matrix with header index
//! - [`view`]: projections and `dropna` over a shared table
//! - [`numeric`]: numeric coercion and type guessing
//! - [`stats`]: reductions and `describe`
//! - [`summary`]: the `describe` result
//! - [`report`]: `info` and `head` overviews
//!
//! ```
//! use tabstat::domain::{DEFAULT_PERCENTILES, LoadOptions};
//! use tabstat::loader::TableLoader;
//! use tabstat::view::TableView;
//!
//! let table = TableLoader::parse_str("x,y\n1,a\n2,b\n3,\n4,c\n", &LoadOptions::default()).unwrap();
//! let view = TableView::from(table);
//! assert_eq!(view.mean("x").unwrap(), 2.5);
//!
//! let summary = view.describe(&DEFAULT_PERCENTILES).unwrap();
//! assert_eq!(summary.columns(), &["x"]);
//! assert_eq!(summary.value("50.0%", "x"), 2.5);
//! ```

use std::path::Path;
use std::sync::Arc;

pub mod domain;
pub mod loader;
pub mod numeric;
pub mod report;
pub mod stats;
pub mod summary;
pub mod table;
pub mod tokenizer;
pub mod view;

use domain::{LoadOptions, TableError};
use loader::TableLoader;
use view::TableView;

/// Loads a comma-separated file with a header row into a full view.
pub fn read_csv(path: impl AsRef<Path>) -> Result<TableView, TableError> {
    read_table(path, &LoadOptions::default())
}

pub fn read_table(path: impl AsRef<Path>, options: &LoadOptions) -> Result<TableView, TableError> {
    let table = TableLoader::load(path, options)?;
    Ok(TableView::new(Arc::new(table)))
}
