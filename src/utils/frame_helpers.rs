//! DataFrame column helpers with validation
//!
//! Typed extraction of metric and text columns so that invalid cells are
//! reported with their column and row instead of turning into NaN scores.

use crate::error::{Result, ScoringError};
use polars::prelude::*;

/// Extract a metric column as `f64` values, one per row
///
/// Integer columns are widened, text columns are parsed. Null cells,
/// unparseable text and non-finite numbers are rejected.
///
/// # Errors
/// - `MissingMetric` if the column does not exist
/// - `InvalidMetricValue` naming the first offending row
pub fn metric_values(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    let raw = df
        .column(column)
        .map_err(|_| ScoringError::MissingMetric {
            column: column.to_string(),
        })?;

    // Non-strict cast: cells that cannot be converted become null
    let numeric = raw.cast(&DataType::Float64)?;
    let numeric = numeric.f64()?;

    let mut values = Vec::with_capacity(numeric.len());
    for (row, value) in numeric.into_iter().enumerate() {
        match value {
            Some(v) if v.is_finite() => values.push(v),
            Some(v) => return Err(ScoringError::invalid_value(column, row, v)),
            None => {
                let cell = raw.get(row)?;
                let shown = if cell.is_null() {
                    "missing value".to_string()
                } else {
                    format!("'{}'", cell_text(&cell))
                };
                return Err(ScoringError::invalid_value(column, row, shown));
            }
        }
    }

    Ok(values)
}

/// Extract a column as text, one entry per row (`None` for nulls)
pub fn text_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    let raw = df.column(column)?;
    let text = raw.cast(&DataType::String)?;

    Ok(text
        .str()?
        .into_iter()
        .map(|opt| opt.map(str::to_string))
        .collect())
}

/// Keep only rows whose text column equals `value`
pub fn filter_rows_equal(df: &DataFrame, column: &str, value: &str) -> Result<DataFrame> {
    let text = df.column(column)?.cast(&DataType::String)?;
    let mask: BooleanChunked = text
        .str()?
        .into_iter()
        .map(|opt| opt.map_or(false, |s| s == value))
        .collect();

    Ok(df.filter(&mask)?)
}

fn cell_text(cell: &AnyValue) -> String {
    match cell {
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}
