//! Stateless numeric coercion of text cells.

use std::fmt;

use crate::domain::NUMERIC_RATIO_THRESHOLD;

/// Number of non-empty cells inspected when guessing a display type.
const DTYPE_SAMPLE: usize = 100;

/// Parses a whole cell as `f64`, NaN when empty or not a number.
///
/// Surrounding whitespace is ignored, but trailing garbage is not: `"12abc"`
/// is NaN, not 12.
///
/// ```
/// use tabstat::numeric::to_numeric;
///
/// assert_eq!(to_numeric(" 1.5"), 1.5);
/// assert!(to_numeric("").is_nan());
/// assert!(to_numeric("12abc").is_nan());
/// ```
pub fn to_numeric(cell: &str) -> f64 {
    parse_number(cell).unwrap_or(f64::NAN)
}

fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

pub fn column_to_numeric<S: AsRef<str>>(cells: &[S]) -> Vec<f64> {
    cells.iter().map(|c| to_numeric(c.as_ref())).collect()
}

/// Whether at least 70% of the non-empty cells parse as numbers.
///
/// A column without any non-empty cell does not qualify.
pub fn is_numeric_column<S: AsRef<str>>(cells: &[S]) -> bool {
    let mut non_empty = 0usize;
    let mut numeric = 0usize;
    for cell in cells.iter().map(AsRef::as_ref) {
        if cell.is_empty() {
            continue;
        }
        non_empty += 1;
        if parse_number(cell).is_some() {
            numeric += 1;
        }
    }
    non_empty > 0 && numeric as f64 / non_empty as f64 >= NUMERIC_RATIO_THRESHOLD
}

/// Display type guessed from a column's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    Int64,
    Float64,
    Str,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Str => "string",
        };
        f.write_str(name)
    }
}

/// Guesses a display type from the first non-empty cells.
///
/// All sampled cells must coerce for a numeric type; any fractional value or
/// decimal point/exponent makes it `float64`.
pub fn infer_dtype<S: AsRef<str>>(cells: &[S]) -> DType {
    let mut sampled = 0usize;
    let mut is_float = false;
    for cell in cells
        .iter()
        .map(AsRef::as_ref)
        .filter(|c| !c.is_empty())
        .take(DTYPE_SAMPLE)
    {
        let Some(value) = parse_number(cell) else {
            return DType::Str;
        };
        sampled += 1;
        if value.fract() != 0.0 || !value.is_finite() || cell.contains(['.', 'e', 'E']) {
            is_float = true;
        }
    }
    match (sampled, is_float) {
        (0, _) => DType::Str,
        (_, true) => DType::Float64,
        (_, false) => DType::Int64,
    }
}
