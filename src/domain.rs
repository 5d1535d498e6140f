use std::fmt;
use std::io::Error;
use std::path::PathBuf;
use std::str::FromStr;

use derive_setters::Setters;

pub const DEFAULT_DELIMITER: char = ',';

/// Fraction of non-empty cells that must coerce to a number for a column to
/// take part in `describe`.
pub const NUMERIC_RATIO_THRESHOLD: f64 = 0.7;

pub const DEFAULT_PERCENTILES: [f64; 3] = [0.25, 0.5, 0.75];

/// Every failure the table engine can report.
#[derive(Debug)]
pub enum TableError {
    Io(Error),
    FileNotFound(PathBuf),
    PermissionDenied(PathBuf),
    LoadingFailed(String),
    /// Name lookup against the header map missed.
    ColumnNotFound(String),
    /// One or more requested names are missing from the full header set.
    ColumnsNotFound(Vec<String>),
    IndexOutOfRange { index: usize, len: usize },
    /// A row is narrower than the column being read.
    CellOutOfRange { row: usize, column: usize, width: usize },
    /// The column exists in the table but was projected away.
    ColumnNotActive(String),
    InvalidArgument(String),
    DuplicateHeader(String),
    RowWidthMismatch { line: usize, expected: usize, actual: usize },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            Self::PermissionDenied(path) => {
                write!(f, "permission denied: {}", path.display())
            }
            Self::LoadingFailed(msg) => write!(f, "loading failed: {msg}"),
            Self::ColumnNotFound(name) => write!(f, "column '{name}' not found"),
            Self::ColumnsNotFound(names) => {
                let quoted = names
                    .iter()
                    .map(|n| format!("'{n}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "columns not found: [{quoted}]")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range (valid range 0..{len})")
            }
            Self::CellOutOfRange { row, column, width } => {
                write!(f, "row {row} has {width} cells, cannot read column {column}")
            }
            Self::ColumnNotActive(name) => {
                write!(f, "column '{name}' is not in the active column set")
            }
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::DuplicateHeader(name) => write!(f, "duplicate header '{name}'"),
            Self::RowWidthMismatch {
                line,
                expected,
                actual,
            } => write!(f, "line {line}: expected {expected} fields, got {actual}"),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Error> for TableError {
    fn from(err: Error) -> Self {
        TableError::Io(err)
    }
}

/// How `dropna` decides whether a row goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropHow {
    /// Drop when at least one evaluated cell is empty.
    #[default]
    Any,
    /// Drop only when every evaluated cell is empty.
    All,
}

impl FromStr for DropHow {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(DropHow::Any),
            "all" => Ok(DropHow::All),
            other => Err(TableError::InvalidArgument(format!(
                "invalid 'how' parameter '{other}': must be 'any' or 'all'"
            ))),
        }
    }
}

/// Settings for `TableLoader`.
///
/// ```
/// use tabstat::domain::LoadOptions;
///
/// let opts = LoadOptions::default().delimiter(';').has_header(false);
/// assert_eq!(opts.delimiter, ';');
/// assert!(!opts.has_header);
/// ```
#[derive(Debug, Clone, Setters)]
pub struct LoadOptions {
    /// Treat the first non-blank line as column names.
    pub has_header: bool,
    pub delimiter: char,
    /// Reject duplicate header names instead of letting the last one win.
    pub strict_headers: bool,
    /// Reject rows whose width differs from the header (or first row).
    pub strict_width: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: DEFAULT_DELIMITER,
            strict_headers: false,
            strict_width: false,
        }
    }
}
