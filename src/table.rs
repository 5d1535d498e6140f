use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{info, instrument, trace};

use crate::domain::{DEFAULT_DELIMITER, TableError};

pub type Row = Vec<String>;

/// Row-major matrix of string cells with an optional header.
///
/// The name→index map is built once when the table is constructed and never
/// changes afterwards. With duplicate header names the last occurrence wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    header_index: HashMap<String, usize>,
    rows: Vec<Row>,
    delimiter: char,
}

impl Table {
    /// Builds a table from headers and rows already held in memory.
    pub fn from_parts(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self::with_delimiter(headers, rows, DEFAULT_DELIMITER)
    }

    pub(crate) fn with_delimiter(headers: Vec<String>, rows: Vec<Row>, delimiter: char) -> Self {
        let header_index = build_header_index(&headers);
        Self {
            headers,
            header_index,
            rows,
            delimiter,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the first row, independent of the header length.
    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Delimiter the table was loaded with.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header_index.get(name).copied()
    }

    pub fn get_row(&self, index: usize) -> Result<&[String], TableError> {
        self.rows
            .get(index)
            .map(Vec::as_slice)
            .ok_or(TableError::IndexOutOfRange {
                index,
                len: self.rows.len(),
            })
    }

    pub fn get_column(&self, name: &str) -> Result<Vec<&str>, TableError> {
        let index = self
            .column_index(name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))?;
        self.get_column_at(index)
    }

    /// Reads one column by position.
    ///
    /// The index is bounded by the first row's width and, when headers exist,
    /// by the header count. Rows narrower than the index are reported instead
    /// of skipped.
    pub fn get_column_at(&self, index: usize) -> Result<Vec<&str>, TableError> {
        let bound = self.column_bound();
        if index >= bound {
            return Err(TableError::IndexOutOfRange { index, len: bound });
        }
        self.rows
            .iter()
            .enumerate()
            .map(|(ridx, row)| {
                row.get(index)
                    .map(String::as_str)
                    .ok_or(TableError::CellOutOfRange {
                        row: ridx,
                        column: index,
                        width: row.len(),
                    })
            })
            .collect()
    }

    /// Cell lookup that never fails: `None` when the row, the column or the
    /// cell itself cannot be reached.
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let cidx = self.column_index(name)?;
        self.rows.get(row)?.get(cidx).map(String::as_str)
    }

    fn column_bound(&self) -> usize {
        let width = self.column_count();
        if self.headers.is_empty() {
            width
        } else {
            width.min(self.headers.len())
        }
    }

    /// Serializes header (if any) and rows, every line terminated by `\n`.
    pub fn to_delimited_string(&self, delimiter: char) -> String {
        let mut buffer = String::with_capacity(self.estimated_size());
        if !self.headers.is_empty() {
            push_joined(&mut buffer, &self.headers, delimiter);
        }
        for row in &self.rows {
            push_joined(&mut buffer, row, delimiter);
        }
        buffer
    }

    /// Writes the table to `path`; the delimiter may differ from the one used
    /// for loading.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), rows = self.rows.len()))]
    pub fn save(&self, path: impl AsRef<Path>, delimiter: char) -> Result<(), TableError> {
        let buffer = self.to_delimited_string(delimiter);
        fs::write(path.as_ref(), &buffer)?;
        info!("Saved {} bytes", buffer.len());
        Ok(())
    }

    fn estimated_size(&self) -> usize {
        let line = |cells: &[String]| cells.iter().map(|c| c.len() + 1).sum::<usize>() + 1;
        line(self.headers.as_slice()) + self.rows.iter().map(|r| line(r.as_slice())).sum::<usize>()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::from_parts(Vec::new(), Vec::new())
    }
}

pub(crate) fn build_header_index(headers: &[String]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(headers.len());
    for (i, name) in headers.iter().enumerate() {
        if let Some(previous) = index.insert(name.clone(), i) {
            trace!("Header '{name}' at {i} shadows column {previous}");
        }
    }
    index
}

pub(crate) fn push_joined(buffer: &mut String, cells: &[String], delimiter: char) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            buffer.push(delimiter);
        }
        buffer.push_str(cell);
    }
    buffer.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn people() -> Table {
        Table::from_parts(
            strings(&["Name", "Age", "City"]),
            vec![
                strings(&["John", "30", "NY"]),
                strings(&["Alice", "25", "LN"]),
                strings(&["Bob", "35", "TK"]),
            ],
        )
    }

    #[test]
    fn counts_and_headers() {
        let t = people();
        assert_eq!(t.row_count(), 3);
        assert_eq!(t.column_count(), 3);
        assert_eq!(t.headers(), &["Name", "Age", "City"]);
    }

    #[test]
    fn column_by_name_and_index() {
        let t = people();
        assert_eq!(t.get_column("Age").unwrap(), vec!["30", "25", "35"]);
        assert_eq!(t.get_column_at(2).unwrap(), vec!["NY", "LN", "TK"]);
    }

    #[test]
    fn missing_column_name() {
        let err = people().get_column("Zip").unwrap_err();
        assert!(matches!(err, TableError::ColumnNotFound(ref n) if n == "Zip"));
    }

    #[test]
    fn row_index_out_of_range() {
        let err = people().get_row(3).unwrap_err();
        assert!(matches!(err, TableError::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn column_index_bounded_by_narrowest_of_header_and_first_row() {
        let t = Table::from_parts(
            strings(&["a", "b"]),
            vec![strings(&["1", "2", "3"])],
        );
        assert_eq!(t.column_count(), 3);
        assert!(matches!(
            t.get_column_at(2),
            Err(TableError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn short_row_reports_cell_out_of_range() {
        let t = Table::from_parts(
            strings(&["a", "b"]),
            vec![strings(&["1", "2"]), strings(&["3"])],
        );
        assert!(matches!(
            t.get_column("b"),
            Err(TableError::CellOutOfRange {
                row: 1,
                column: 1,
                width: 1
            })
        ));
        assert_eq!(t.cell(1, "b"), None);
        assert_eq!(t.cell(1, "a"), Some("3"));
    }

    #[test]
    fn duplicate_headers_last_wins() {
        let t = Table::from_parts(
            strings(&["x", "x"]),
            vec![strings(&["first", "second"])],
        );
        assert_eq!(t.column_index("x"), Some(1));
        assert_eq!(t.get_column("x").unwrap(), vec!["second"]);
    }

    #[test]
    fn headerless_table_uses_first_row_width() {
        let t = Table::from_parts(Vec::new(), vec![strings(&["1", "2"])]);
        assert_eq!(t.get_column_at(1).unwrap(), vec!["2"]);
    }

    #[test]
    fn empty_table() {
        let t = Table::default();
        assert_eq!(t.row_count(), 0);
        assert_eq!(t.column_count(), 0);
        assert!(t.get_column_at(0).is_err());
        assert_eq!(t.to_delimited_string(','), "");
    }

    #[test]
    fn serializes_with_other_delimiter() {
        let t = people();
        assert_eq!(
            t.to_delimited_string(';'),
            "Name;Age;City\nJohn;30;NY\nAlice;25;LN\nBob;35;TK\n"
        );
    }

    #[test]
    fn headerless_serialization_has_no_header_line() {
        let t = Table::from_parts(Vec::new(), vec![strings(&["1", ""])]);
        assert_eq!(t.to_delimited_string(','), "1,\n");
    }
}
