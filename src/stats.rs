//! Numeric reductions over coerced columns and the view-level statistics API.
//!
//! All reductions skip NaN entries. A reduction without any valid entry
//! returns NaN instead of failing, so dirty data never aborts the pipeline.

use tracing::{debug, instrument};

use crate::domain::TableError;
use crate::numeric::{column_to_numeric, is_numeric_column};
use crate::summary::Summary;
use crate::view::TableView;

fn valid(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| !v.is_nan())
}

pub fn count(values: &[f64]) -> usize {
    valid(values).count()
}

pub fn mean(values: &[f64]) -> f64 {
    let (sum, n) = valid(values).fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Sample variance (divisor `n - 1`), NaN with fewer than two valid entries.
pub fn var(values: &[f64]) -> f64 {
    let n = count(values);
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let squares: f64 = valid(values).map(|v| (v - m).powi(2)).sum();
    squares / (n - 1) as f64
}

pub fn std(values: &[f64]) -> f64 {
    var(values).sqrt()
}

pub fn min(values: &[f64]) -> f64 {
    valid(values).reduce(f64::min).unwrap_or(f64::NAN)
}

pub fn max(values: &[f64]) -> f64 {
    valid(values).reduce(f64::max).unwrap_or(f64::NAN)
}

/// Linearly interpolated quantile at `q` in `[0, 1]`.
///
/// ```
/// use tabstat::stats::quantile;
///
/// assert_eq!(quantile(&[4.0, 1.0, 3.0, 2.0], 0.5).unwrap(), 2.5);
/// assert!(quantile(&[1.0], 1.5).is_err());
/// ```
pub fn quantile(values: &[f64], q: f64) -> Result<f64, TableError> {
    check_quantile(q)?;
    Ok(quantile_unchecked(values, q))
}

fn quantile_unchecked(values: &[f64], q: f64) -> f64 {
    let mut sorted: Vec<f64> = valid(values).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(f64::total_cmp);
    interpolate(&sorted, q)
}

fn check_quantile(q: f64) -> Result<(), TableError> {
    if (0.0..=1.0).contains(&q) {
        Ok(())
    } else {
        Err(TableError::InvalidArgument(format!(
            "quantile {q} must be between 0 and 1"
        )))
    }
}

fn interpolate(sorted: &[f64], q: f64) -> f64 {
    let last = sorted.len() - 1;
    let pos = q * last as f64;
    let lower = (pos.floor() as usize).min(last);
    let upper = (lower + 1).min(last);
    let fraction = pos - lower as f64;
    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}

/// Most frequent valid value.
///
/// Values are scanned in ascending order and a count must be strictly larger
/// to replace the current mode, so ties resolve to the smallest value.
pub fn mode(values: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = valid(values).collect();
    sorted.sort_by(f64::total_cmp);

    let mut best = f64::NAN;
    let mut best_count = 0usize;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let run = sorted[i..].iter().take_while(|&&v| v == value).count();
        if run > best_count {
            best = value;
            best_count = run;
        }
        i += run;
    }
    best
}

/// Row label used by `describe` for a percentile, e.g. `0.25` → `"25.0%"`.
pub fn percentile_label(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

impl TableView {
    /// Coerced values of an active column.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, TableError> {
        Ok(column_to_numeric(&self.get_column(name)?))
    }

    pub fn count(&self, name: &str) -> Result<usize, TableError> {
        Ok(count(&self.numeric_column(name)?))
    }

    pub fn mean(&self, name: &str) -> Result<f64, TableError> {
        Ok(mean(&self.numeric_column(name)?))
    }

    pub fn var(&self, name: &str) -> Result<f64, TableError> {
        Ok(var(&self.numeric_column(name)?))
    }

    pub fn std(&self, name: &str) -> Result<f64, TableError> {
        Ok(std(&self.numeric_column(name)?))
    }

    pub fn min(&self, name: &str) -> Result<f64, TableError> {
        Ok(min(&self.numeric_column(name)?))
    }

    pub fn max(&self, name: &str) -> Result<f64, TableError> {
        Ok(max(&self.numeric_column(name)?))
    }

    pub fn quantile(&self, name: &str, q: f64) -> Result<f64, TableError> {
        quantile(&self.numeric_column(name)?, q)
    }

    pub fn mode(&self, name: &str) -> Result<f64, TableError> {
        Ok(mode(&self.numeric_column(name)?))
    }

    /// Quantile of every active column, in active order.
    pub fn quantile_all(&self, q: f64) -> Result<Vec<f64>, TableError> {
        check_quantile(q)?;
        self.headers()
            .iter()
            .map(|n| Ok(quantile_unchecked(&self.numeric_column(n)?, q)))
            .collect()
    }

    /// Mode of every active column, in active order.
    pub fn mode_all(&self) -> Result<Vec<f64>, TableError> {
        self.headers().iter().map(|n| self.mode(n)).collect()
    }

    /// Builds the `describe` summary over the qualifying numeric columns.
    ///
    /// Rows are `count, mean, std, min, max` followed by one row per
    /// percentile. Columns where fewer than 70% of the non-empty cells are
    /// numbers are left out silently.
    #[instrument(skip(self), fields(columns = self.column_count()))]
    pub fn describe(&self, percentiles: &[f64]) -> Result<Summary, TableError> {
        for &p in percentiles {
            check_quantile(p)?;
        }
        let labels: Vec<String> = percentiles.iter().map(|&p| percentile_label(p)).collect();

        let mut summary = Summary::new();
        for row in ["count", "mean", "std", "min", "max"] {
            summary.add_row(row);
        }
        for label in &labels {
            summary.add_row(label);
        }

        for name in self.headers() {
            let cells = self.get_column(name)?;
            if !is_numeric_column(&cells) {
                debug!("Skipping non-numeric column '{name}'");
                continue;
            }
            let values = column_to_numeric(&cells);
            let mut sorted: Vec<f64> = valid(&values).collect();
            sorted.sort_by(f64::total_cmp);

            summary.add_column(name);
            summary.set_value("count", name, sorted.len() as f64);
            summary.set_value("mean", name, mean(&values));
            summary.set_value("std", name, std(&values));
            summary.set_value("min", name, min(&values));
            summary.set_value("max", name, max(&values));
            for (label, &p) in labels.iter().zip(percentiles) {
                let value = if sorted.is_empty() {
                    f64::NAN
                } else {
                    interpolate(&sorted, p)
                };
                summary.set_value(label, name, value);
            }
        }
        Ok(summary)
    }
}
