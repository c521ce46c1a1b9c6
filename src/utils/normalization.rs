//! Column Normalization
//!
//! Renames raw metric columns to their display names (Metric Schema), then
//! rescales the Percentage Metric Set from fractions to percentages.
//!
//! Order matters: the percentage set refers to post-rename names, and the
//! weight table assumes percentage-scale values. The result is wrapped in
//! `NormalizedFrame`, which only this module can build and the score
//! calculator consumes, so a dataset is normalized exactly once.

use crate::config::{FractionPolicy, ScoringConfig, COMPANY_COLUMN};
use crate::data::CompanyData;
use crate::error::{Result, ScoringError};
use crate::utils::frame_helpers::metric_values;
use polars::prelude::*;

/// Table with display column names and percentage-scale values
#[derive(Debug, Clone)]
pub struct NormalizedFrame {
    frame: DataFrame,
}

impl NormalizedFrame {
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub(crate) fn into_inner(self) -> DataFrame {
        self.frame
    }
}

/// Normalize a raw company table
///
/// The raw input is left untouched; a new table is returned.
///
/// # Errors
/// - `SchemaMismatch` if `Company`, a Metric Schema raw name or a percentage
///   column is absent
/// - `InvalidConfig` if the configuration is inconsistent (e.g. chained renames)
/// - `DuplicateColumn` if a display name already exists as an unrelated column
/// - `InvalidMetricValue` for a row without a `Company` identifier
/// - `InvalidMetricValue` for unusable percentage cells
/// - `FractionOutOfRange` for percentage cells outside [0, 1] under
///   `FractionPolicy::Strict`
pub fn normalize_columns(data: &CompanyData, config: &ScoringConfig) -> Result<NormalizedFrame> {
    config.validate()?;

    // STEP 1: Validate the raw schema before touching anything
    if !data.has_column(COMPANY_COLUMN) {
        return Err(ScoringError::SchemaMismatch {
            column: COMPANY_COLUMN.to_string(),
        });
    }

    for rename in &config.metric_schema {
        if !data.has_column(&rename.raw) {
            return Err(ScoringError::SchemaMismatch {
                column: rename.raw.clone(),
            });
        }
        if rename.raw != rename.display && data.has_column(&rename.display) {
            return Err(ScoringError::DuplicateColumn {
                column: rename.display.clone(),
            });
        }
    }

    // STEP 2: Rename (columns outside the schema pass through)
    let mut frame = data.frame().clone();
    for rename in &config.metric_schema {
        if rename.raw == rename.display {
            continue;
        }
        frame.rename(&rename.raw, rename.display.as_str().into())?;
        tracing::debug!("Renamed '{}' -> '{}'", rename.raw, rename.display);
    }

    // STEP 3: Rescale fractions to percentages
    for column in &config.percentage_columns {
        if frame.get_column_index(column).is_none() {
            return Err(ScoringError::SchemaMismatch {
                column: column.clone(),
            });
        }

        let values = metric_values(&frame, column)?;

        if config.fraction_policy == FractionPolicy::Strict {
            check_fractions(column, &values)?;
        }

        let scaled: Vec<f64> = values.iter().map(|v| v * 100.0).collect();
        frame.with_column(Series::new(column.as_str().into(), scaled))?;
        tracing::debug!("Rescaled '{}' to percentages", column);
    }

    // Identifiers are compared as text from here on; every row needs one
    let company = frame.column(COMPANY_COLUMN)?.cast(&DataType::String)?;
    if let Some(row) = company.str()?.into_iter().position(|name| name.is_none()) {
        return Err(ScoringError::invalid_value(
            COMPANY_COLUMN,
            row,
            "missing company identifier",
        ));
    }
    frame.with_column(company)?;

    tracing::info!(
        "Normalized {} rows ({} renamed, {} rescaled)",
        frame.height(),
        config.metric_schema.len(),
        config.percentage_columns.len()
    );

    Ok(NormalizedFrame { frame })
}

fn check_fractions(column: &str, values: &[f64]) -> Result<()> {
    match values
        .iter()
        .enumerate()
        .find(|(_, v)| !(0.0..=1.0).contains(*v))
    {
        Some((row, &value)) => Err(ScoringError::FractionOutOfRange {
            column: column.to_string(),
            row,
            value,
        }),
        None => Ok(()),
    }
}
