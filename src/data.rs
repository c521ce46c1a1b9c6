//! Data Loading
//!
//! Reads the company sustainability metrics table with Polars. The loaded
//! table keeps the raw column names; renaming and rescaling happen in
//! `utils::normalization`.

use crate::error::{Result, ScoringError};
use polars::prelude::*;
use std::io;
use std::path::Path;

/// Raw company metrics, one row per company, as read from the source file
#[derive(Debug, Clone)]
pub struct CompanyData {
    frame: DataFrame,
}

impl CompanyData {
    /// Load a comma-separated file with a header line
    ///
    /// Schema inference scans the whole file, so a malformed numeric cell
    /// turns its column into text instead of failing the read. The score
    /// calculator then reports the exact cell.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ScoringError::Io {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "dataset file not found"),
            });
        }

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        tracing::info!(
            "Loaded dataset {:?}: {} companies, {} columns",
            path,
            frame.height(),
            frame.width()
        );

        Ok(Self { frame })
    }

    /// Wrap a table that is already in memory
    pub fn from_frame(frame: DataFrame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of company rows
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_index(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_frame() {
        let frame = df!(
            "Company" => ["Acme", "Globex"],
            "Value of Waste" => [10.0, 20.0],
        )
        .unwrap();

        let data = CompanyData::from_frame(frame);
        assert_eq!(data.height(), 2);
        assert!(data.has_column("Value of Waste"));
        assert!(!data.has_column("Value of Waste (EUR)"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = CompanyData::load(Path::new("/nonexistent/companies.csv")).unwrap_err();
        assert!(matches!(err, ScoringError::Io { .. }));
    }
}
