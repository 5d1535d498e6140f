use std::collections::HashMap;
use std::fmt;

use crate::domain::TableError;

const MIN_INDEX_WIDTH: usize = 10;
const MIN_COLUMN_WIDTH: usize = 12;

/// Statistic-by-column table produced by `describe`.
///
/// Rows and columns keep their insertion order. Callers may add rows after
/// the fact (e.g. `var` or `mode`) before rendering. Missing cells read back
/// as NaN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    index: Vec<String>,
    columns: Vec<String>,
    values: HashMap<(String, String), f64>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn add_row(&mut self, name: &str) {
        if !self.index.iter().any(|r| r == name) {
            self.index.push(name.to_string());
        }
    }

    pub fn add_column(&mut self, name: &str) {
        if !self.columns.iter().any(|c| c == name) {
            self.columns.push(name.to_string());
        }
    }

    /// Stores a value, creating the row and column when needed.
    pub fn set_value(&mut self, row: &str, column: &str, value: f64) {
        self.add_row(row);
        self.add_column(column);
        self.values
            .insert((row.to_string(), column.to_string()), value);
    }

    pub fn value(&self, row: &str, column: &str) -> f64 {
        self.values
            .get(&(row.to_string(), column.to_string()))
            .copied()
            .unwrap_or(f64::NAN)
    }

    /// Assigns a whole row, one value per column in column order.
    pub fn set_row(&mut self, row: &str, values: &[f64]) -> Result<(), TableError> {
        if values.len() != self.columns.len() {
            return Err(TableError::InvalidArgument(format!(
                "row '{row}' needs {} values, got {}",
                self.columns.len(),
                values.len()
            )));
        }
        self.add_row(row);
        let columns = self.columns.clone();
        for (column, &value) in columns.iter().zip(values) {
            self.set_value(row, column, value);
        }
        Ok(())
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index_width = self
            .index
            .iter()
            .map(|r| r.len() + 2)
            .fold(MIN_INDEX_WIDTH, usize::max);
        let widths: Vec<usize> = self
            .columns
            .iter()
            .map(|c| (c.len() + 2).max(MIN_COLUMN_WIDTH))
            .collect();

        write!(f, "{:>index_width$}", "")?;
        for (column, width) in self.columns.iter().zip(&widths) {
            write!(f, "{column:>width$}")?;
        }
        writeln!(f)?;

        for row in &self.index {
            write!(f, "{row:>index_width$}")?;
            for (column, width) in self.columns.iter().zip(&widths) {
                let value = self.value(row, column);
                if value.is_nan() {
                    write!(f, "{:>width$}", "NaN")?;
                } else {
                    write!(f, "{value:>width$.4}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_and_columns_keep_insertion_order() {
        let mut s = Summary::new();
        s.set_value("mean", "b", 1.0);
        s.set_value("count", "a", 2.0);
        s.add_row("mean");
        assert_eq!(s.index(), &["mean", "count"]);
        assert_eq!(s.columns(), &["b", "a"]);
    }

    #[test]
    fn missing_value_is_nan() {
        let mut s = Summary::new();
        s.set_value("mean", "a", 1.0);
        s.add_column("b");
        assert_eq!(s.value("mean", "a"), 1.0);
        assert!(s.value("mean", "b").is_nan());
        assert!(s.value("nope", "a").is_nan());
    }

    #[test]
    fn set_row_assigns_in_column_order() {
        let mut s = Summary::new();
        s.add_column("x");
        s.add_column("y");
        s.set_row("var", &[1.5, 2.5]).unwrap();
        assert_eq!(s.value("var", "x"), 1.5);
        assert_eq!(s.value("var", "y"), 2.5);
        assert!(matches!(
            s.set_row("mode", &[1.0]),
            Err(TableError::InvalidArgument(_))
        ));
        assert_eq!(s.index(), &["var"]);
    }

    #[test]
    fn renders_fixed_width_table() {
        let mut s = Summary::new();
        s.set_value("count", "age", 3.0);
        s.set_value("mean", "age", 30.0);
        s.add_row("std");
        let expected = format!(
            "{:>10}{:>12}\n{:>10}{:>12}\n{:>10}{:>12}\n{:>10}{:>12}\n",
            "", "age", "count", "3.0000", "mean", "30.0000", "std", "NaN"
        );
        assert_eq!(s.to_string(), expected);
    }
}
