//! Bulk reader that turns a delimited text file into a [`Table`].
//!
//! The whole file is read into memory in one call, split into lines and
//! tokenized line by line. Blank lines contribute no row.
//!
//! ```
//! use tabstat::domain::LoadOptions;
//! use tabstat::loader::TableLoader;
//!
//! let table = TableLoader::parse_str("a,b\n1,2\n3,4\n", &LoadOptions::default()).unwrap();
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.headers(), &["a", "b"]);
//! ```

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, instrument, trace, warn};

use crate::domain::{LoadOptions, TableError};
use crate::table::{Row, Table};
use crate::tokenizer::{split_line, split_lines};

pub struct TableLoader;

impl TableLoader {
    /// Reads and parses the file at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Table, TableError> {
        let start_time = Instant::now();
        let content = Self::read_file(path.as_ref())?;
        let table = Self::parse_str(&content, options)?;
        info!(
            "Loaded {} rows x {} columns in {}ms",
            table.row_count(),
            table.column_count(),
            start_time.elapsed().as_millis()
        );
        Ok(table)
    }

    /// Parses text already held in memory.
    pub fn parse_str(input: &str, options: &LoadOptions) -> Result<Table, TableError> {
        let delimiter = options.delimiter;
        if matches!(delimiter, '\r' | '\n') {
            return Err(TableError::InvalidArgument(
                "delimiter cannot be a line terminator".to_string(),
            ));
        }
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);

        let mut lines = split_lines(input);
        let headers = if options.has_header {
            lines
                .next()
                .map(|(_, line)| split_line(line, delimiter))
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        if options.strict_headers {
            check_unique_headers(&headers)?;
        }

        let mut rows: Vec<Row> = Vec::with_capacity(input.len() / 32 + 1);
        let mut expected_width = (!headers.is_empty()).then_some(headers.len());
        for (line_no, line) in lines {
            let row = split_line(line, delimiter);
            trace!("Line {line_no}: {} fields", row.len());
            if options.strict_width {
                let expected = *expected_width.get_or_insert(row.len());
                if row.len() != expected {
                    return Err(TableError::RowWidthMismatch {
                        line: line_no,
                        expected,
                        actual: row.len(),
                    });
                }
            }
            rows.push(row);
        }
        debug!(
            "Parsed {} header fields and {} rows",
            headers.len(),
            rows.len()
        );

        Ok(Table::with_delimiter(headers, rows, delimiter))
    }

    fn read_file(path: &Path) -> Result<String, TableError> {
        let metadata = fs::metadata(path).map_err(|e| map_io_error(e, path))?;
        if !metadata.is_file() {
            return Err(TableError::LoadingFailed(format!(
                "{} is not a file",
                path.display()
            )));
        }
        debug!("Reading {} bytes", metadata.len());
        let bytes = fs::read(path).map_err(|e| map_io_error(e, path))?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!("{} is not valid UTF-8, replacing invalid bytes", path.display());
                Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        }
    }
}

fn map_io_error(e: std::io::Error, path: &Path) -> TableError {
    match e.kind() {
        ErrorKind::NotFound => TableError::FileNotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => TableError::PermissionDenied(path.to_path_buf()),
        _ => TableError::Io(e),
    }
}

fn check_unique_headers(headers: &[String]) -> Result<(), TableError> {
    let mut seen = HashSet::with_capacity(headers.len());
    for name in headers {
        if !seen.insert(name.as_str()) {
            return Err(TableError::DuplicateHeader(name.clone()));
        }
    }
    Ok(())
}
