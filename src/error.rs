//! Error types for the scoring pipeline
//!
//! Pipeline errors (schema, metric and value problems) are fatal for the
//! dataset they were raised on. Lookup misses are recoverable and are meant
//! to be shown as "no data" by whatever renders the result.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T, E = ScoringError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ScoringError {
    /// A column the Metric Schema (or the input contract) expects is absent
    #[error("Schema mismatch: expected column '{column}' is missing from the input")]
    SchemaMismatch { column: String },

    /// Renaming would produce a column name that already exists
    #[error("Schema mismatch: column '{column}' would appear twice after renaming")]
    DuplicateColumn { column: String },

    /// A Weight Table key is not a column of the normalized table
    #[error("Missing metric column '{column}' required by the weight table")]
    MissingMetric { column: String },

    /// A weighted or percentage cell is null, unparseable or not finite
    #[error("Invalid value in metric column '{column}' at row {row}: {value}")]
    InvalidMetricValue {
        column: String,
        row: usize,
        value: String,
    },

    /// A percentage column holds a value that is not a fraction in [0, 1]
    #[error("Column '{column}' row {row}: {value} is not a fraction in [0, 1]")]
    FractionOutOfRange {
        column: String,
        row: usize,
        value: f64,
    },

    #[error("Company '{company}' not found")]
    CompanyNotFound { company: String },

    #[error("Company '{company}' is ambiguous: {matches} rows share this name")]
    DuplicateCompany { company: String, matches: usize },

    #[error("Invalid scoring configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),
}

impl ScoringError {
    /// Lookup misses the presentation layer should render as "no data"
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CompanyNotFound { .. } | Self::DuplicateCompany { .. }
        )
    }

    pub(crate) fn invalid_value(column: &str, row: usize, value: impl ToString) -> Self {
        Self::InvalidMetricValue {
            column: column.to_string(),
            row,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_misses_are_recoverable() {
        let not_found = ScoringError::CompanyNotFound {
            company: "Acme".to_string(),
        };
        let duplicate = ScoringError::DuplicateCompany {
            company: "Acme".to_string(),
            matches: 2,
        };
        assert!(not_found.is_recoverable());
        assert!(duplicate.is_recoverable());
    }

    #[test]
    fn test_pipeline_errors_are_fatal() {
        let err = ScoringError::MissingMetric {
            column: "End of Life Score".to_string(),
        };
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("End of Life Score"));
    }

    #[test]
    fn test_invalid_value_message_names_cell() {
        let err = ScoringError::invalid_value("Value of Waste (EUR)", 3, "n/a");
        assert_eq!(
            err.to_string(),
            "Invalid value in metric column 'Value of Waste (EUR)' at row 3: n/a"
        );
    }
}
