//! Sustainability Scorer - main coordinator
//!
//! Runs load → normalize → score exactly once, then answers filter and
//! detail requests against the immutable scored table. Each request is an
//! independent read; the table can be shared across threads behind an `Arc`.

use crate::config::ScoringConfig;
use crate::data::CompanyData;
use crate::detail::{company_detail, CompanyDetail};
use crate::error::Result;
use crate::metrics::{calculate_scores, ScoreBounds, ScoredTable};
use crate::ranking::{filter_frame, rank_companies, RankedCompany, ScoreRange};
use crate::utils::normalization::normalize_columns;
use polars::prelude::DataFrame;
use std::path::Path;

pub struct SustainabilityScorer {
    config: ScoringConfig,
    table: ScoredTable,
}

impl SustainabilityScorer {
    /// Load a CSV dataset and score it
    pub fn from_csv(path: &Path, config: ScoringConfig) -> Result<Self> {
        let data = CompanyData::load(path)?;
        Self::from_data(&data, config)
    }

    /// Score a table already held in memory
    pub fn from_frame(frame: DataFrame, config: ScoringConfig) -> Result<Self> {
        Self::from_data(&CompanyData::from_frame(frame), config)
    }

    /// Normalize and score raw company data
    ///
    /// # Errors
    /// Configuration, schema and metric errors are returned before any
    /// score is produced.
    pub fn from_data(data: &CompanyData, config: ScoringConfig) -> Result<Self> {
        config.validate()?;

        let normalized = normalize_columns(data, &config)?;
        let table = calculate_scores(normalized, &config)?;

        Ok(Self { config, table })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn table(&self) -> &ScoredTable {
        &self.table
    }

    /// Companies inside the range, highest score first
    pub fn qualifying_companies(&self, range: ScoreRange) -> Result<Vec<RankedCompany>> {
        rank_companies(&self.table, range)
    }

    /// Full rows inside the range, highest score first
    pub fn qualifying_frame(&self, range: ScoreRange) -> Result<DataFrame> {
        filter_frame(&self.table, range)
    }

    pub fn company_detail(&self, company: &str) -> Result<CompanyDetail> {
        company_detail(&self.table, company)
    }

    /// Observed score range, the default filter selection
    pub fn score_bounds(&self) -> Result<Option<ScoreBounds>> {
        self.table.score_bounds()
    }

    /// Range covering every company; an empty table yields an empty range
    pub fn default_range(&self) -> Result<ScoreRange> {
        Ok(self
            .score_bounds()?
            .map(ScoreRange::from_bounds)
            .unwrap_or_else(|| ScoreRange::new(0.0, 0.0)))
    }

    /// Distinct company identifiers, first appearance first
    pub fn company_names(&self) -> Result<Vec<String>> {
        self.table.company_names()
    }

    /// Scores recomputed from the stored metrics (equal to the stored ones)
    pub fn recompute_scores(&self) -> Result<Vec<f64>> {
        self.table.recompute_scores()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoringError;
    use polars::prelude::*;

    #[test]
    fn test_invalid_config_rejected_before_scoring() {
        let mut config = ScoringConfig::default();
        config.weights.clear();

        let frame = df!["Company" => &["Acme"]].unwrap();
        let result = SustainabilityScorer::from_frame(frame, config);
        assert!(matches!(result, Err(ScoringError::InvalidConfig(_))));
    }

    #[test]
    fn test_schema_checked_before_scoring() {
        let frame = df![
            "Company" => &["Acme"],
            "Sustainability Impact Score" => &[0.8],
        ]
        .unwrap();

        let result = SustainabilityScorer::from_frame(frame, ScoringConfig::default());
        assert!(matches!(
            result,
            Err(ScoringError::SchemaMismatch { column }) if column == "Local Business Engagement Rate"
        ));
    }
}
