use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::domain::{DropHow, TableError};
use crate::table::{Row, Table, push_joined};

/// Projection over a shared [`Table`] restricted to an ordered list of
/// active columns.
///
/// Every accessor is expressed in terms of the active columns. The
/// underlying table is never modified; `dropna` builds a new one.
#[derive(Debug, Clone)]
pub struct TableView {
    table: Arc<Table>,
    active_columns: Vec<String>,
}

impl TableView {
    /// View with every header active.
    pub fn new(table: Arc<Table>) -> Self {
        let active_columns = table.headers().to_vec();
        Self {
            table,
            active_columns,
        }
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// Active column names, in display order.
    pub fn headers(&self) -> &[String] {
        &self.active_columns
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.active_columns.len()
    }

    fn is_full_projection(&self) -> bool {
        self.active_columns.as_slice() == self.table.headers()
    }

    /// Selects columns by name, resolved against the full table.
    ///
    /// Columns dropped by an earlier projection can be selected again. The
    /// result keeps exactly the requested order.
    pub fn project<S: AsRef<str>>(&self, columns: &[S]) -> Result<TableView, TableError> {
        let missing: Vec<String> = columns
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| self.table.column_index(name).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(TableError::ColumnsNotFound(missing));
        }
        let active_columns: Vec<String> =
            columns.iter().map(|c| c.as_ref().to_string()).collect();
        debug!("Projected onto {:?}", active_columns);
        Ok(TableView {
            table: Arc::clone(&self.table),
            active_columns,
        })
    }

    /// Cells of the active columns for one row, in active order.
    pub fn get_row(&self, index: usize) -> Result<Row, TableError> {
        let row = self.table.get_row(index)?;
        if self.is_full_projection() {
            return Ok(row.to_vec());
        }
        self.active_columns
            .iter()
            .map(|name| {
                let cidx = self
                    .table
                    .column_index(name)
                    .ok_or_else(|| TableError::ColumnNotFound(name.clone()))?;
                row.get(cidx).cloned().ok_or(TableError::CellOutOfRange {
                    row: index,
                    column: cidx,
                    width: row.len(),
                })
            })
            .collect()
    }

    /// Column by name; the name must be active.
    pub fn get_column(&self, name: &str) -> Result<Vec<&str>, TableError> {
        if !self.active_columns.iter().any(|c| c == name) {
            return Err(TableError::ColumnNotActive(name.to_string()));
        }
        self.table.get_column(name)
    }

    /// Column by position within the active columns.
    pub fn get_column_at(&self, index: usize) -> Result<Vec<&str>, TableError> {
        let name = self
            .active_columns
            .get(index)
            .ok_or(TableError::IndexOutOfRange {
                index,
                len: self.active_columns.len(),
            })?;
        self.table.get_column(name)
    }

    /// All rows restricted to the active columns.
    pub fn data(&self) -> Result<Vec<Row>, TableError> {
        (0..self.row_count()).map(|i| self.get_row(i)).collect()
    }

    /// Drops rows with empty cells.
    ///
    /// `subset` names the columns to evaluate; empty means every active
    /// column. With [`DropHow::Any`] a row goes when any evaluated cell is
    /// empty or missing, with [`DropHow::All`] only when none is non-empty.
    /// The surviving rows keep the full header list of the table and the
    /// returned view keeps this view's active columns.
    #[instrument(skip(self, subset), fields(rows = self.row_count()))]
    pub fn dropna<S: AsRef<str>>(&self, subset: &[S], how: DropHow) -> Result<TableView, TableError> {
        let evaluated: Vec<&str> = if subset.is_empty() {
            self.active_columns.iter().map(String::as_str).collect()
        } else {
            let names: Vec<&str> = subset.iter().map(AsRef::as_ref).collect();
            let missing: Vec<String> = names
                .iter()
                .filter(|n| !self.active_columns.iter().any(|c| c == *n))
                .map(|n| n.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(TableError::ColumnsNotFound(missing));
            }
            names
        };

        let keep = |ridx: usize| {
            let mut cells = evaluated.iter().map(|name| self.table.cell(ridx, name));
            match how {
                DropHow::Any => cells.all(|c| c.is_some_and(|v| !v.is_empty())),
                DropHow::All => cells.any(|c| c.is_some_and(|v| !v.is_empty())),
            }
        };
        let rows: Vec<Row> = self
            .table
            .rows()
            .iter()
            .enumerate()
            .filter(|&(ridx, _)| keep(ridx))
            .map(|(_, row)| row.clone())
            .collect();
        info!(
            "dropna({how:?}) kept {} of {} rows",
            rows.len(),
            self.row_count()
        );

        let table = Table::with_delimiter(
            self.table.headers().to_vec(),
            rows,
            self.table.delimiter(),
        );
        Ok(TableView {
            table: Arc::new(table),
            active_columns: self.active_columns.clone(),
        })
    }

    /// Serializes the active columns: header line, then every projected row.
    pub fn to_delimited_string(&self, delimiter: char) -> Result<String, TableError> {
        if self.is_full_projection() {
            return Ok(self.table.to_delimited_string(delimiter));
        }
        let mut buffer = String::new();
        push_joined(&mut buffer, &self.active_columns, delimiter);
        for row in self.data()? {
            push_joined(&mut buffer, &row, delimiter);
        }
        Ok(buffer)
    }

    /// Writes the active columns to `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>, delimiter: char) -> Result<(), TableError> {
        let buffer = self.to_delimited_string(delimiter)?;
        fs::write(path.as_ref(), &buffer)?;
        info!("Saved {} columns x {} rows", self.column_count(), self.row_count());
        Ok(())
    }
}

impl From<Table> for TableView {
    fn from(table: Table) -> Self {
        TableView::new(Arc::new(table))
    }
}
