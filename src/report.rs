//! Plain-text overviews of a view: column info and the first rows.

use std::fmt;

use crate::domain::TableError;
use crate::numeric::{DType, infer_dtype};
use crate::table::Row;
use crate::view::TableView;

const HEAD_CELL_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub dtype: DType,
}

/// Column overview returned by [`TableView::info`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub entries: usize,
    pub columns: Vec<ColumnInfo>,
}

impl fmt::Display for TableInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "RangeIndex: {} entries, 0 to {}",
            self.entries,
            self.entries.saturating_sub(1)
        )?;
        writeln!(f, "Data columns (total {} columns):", self.columns.len())?;
        writeln!(f, "{:>5}{:>25}{:>15}{:>15}", "#", "Column", "Non-Null Count", "Dtype")?;
        writeln!(f, "{}", "-".repeat(60))?;
        for (i, column) in self.columns.iter().enumerate() {
            writeln!(
                f,
                "{i:>5}{:>25}{:>15} non-null{:>15}",
                column.name,
                column.non_null,
                column.dtype.to_string()
            )?;
        }
        Ok(())
    }
}

/// First rows of a view, rendered as fixed-width columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Head {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in &self.headers {
            write!(f, "{name:>width$}", width = HEAD_CELL_WIDTH)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(HEAD_CELL_WIDTH * self.headers.len()))?;
        for row in &self.rows {
            for cell in row {
                write!(f, "{cell:>width$}", width = HEAD_CELL_WIDTH)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl TableView {
    /// Non-empty count and display type of every active column.
    pub fn info(&self) -> Result<TableInfo, TableError> {
        let columns = self
            .headers()
            .iter()
            .map(|name| {
                let cells = self.get_column(name)?;
                Ok(ColumnInfo {
                    name: name.clone(),
                    non_null: cells.iter().filter(|c| !c.is_empty()).count(),
                    dtype: infer_dtype(&cells),
                })
            })
            .collect::<Result<Vec<_>, TableError>>()?;
        Ok(TableInfo {
            entries: self.row_count(),
            columns,
        })
    }

    /// The first `n` rows (fewer if the view is shorter).
    pub fn head(&self, n: usize) -> Result<Head, TableError> {
        let rows = (0..n.min(self.row_count()))
            .map(|i| self.get_row(i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Head {
            headers: self.headers().to_vec(),
            rows,
        })
    }
}
