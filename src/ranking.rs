//! Range Filter & Ranker
//!
//! Selects companies whose Sustainability Score lies in an inclusive range
//! and orders them by descending score. Ties keep their original row order.
//! The canonical scored table is never modified; every call returns a new
//! derived table.

use crate::config::{COMPANY_COLUMN, SCORE_COLUMN};
use crate::error::Result;
use crate::metrics::{ScoreBounds, ScoredTable};
use crate::utils::frame_helpers::text_values;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Inclusive score range requested by the caller
///
/// `min_score > max_score` is allowed and selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ScoreRange {
    pub min_score: f64,
    pub max_score: f64,
}

impl ScoreRange {
    pub fn new(min_score: f64, max_score: f64) -> Self {
        Self {
            min_score,
            max_score,
        }
    }

    /// Range covering every score of a table (the default selection)
    pub fn from_bounds(bounds: ScoreBounds) -> Self {
        Self::new(bounds.min, bounds.max)
    }

    pub fn contains(&self, score: f64) -> bool {
        self.min_score <= score && score <= self.max_score
    }

    /// True when no score can satisfy the range (inverted or NaN bounds)
    pub fn is_empty(&self) -> bool {
        !(self.min_score <= self.max_score)
    }
}

/// One row of the ranked result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCompany {
    pub company: String,
    pub score: f64,
}

/// Filter and sort the full scored table
///
/// Returns every column of the qualifying rows, highest score first.
pub fn filter_frame(table: &ScoredTable, range: ScoreRange) -> Result<DataFrame> {
    if range.is_empty() {
        tracing::debug!(
            "Inverted score range [{}, {}]: nothing qualifies",
            range.min_score,
            range.max_score
        );
        return Ok(table.frame().head(Some(0)));
    }

    let score = || col(SCORE_COLUMN);
    let filtered = table
        .frame()
        .clone()
        .lazy()
        .filter(
            score()
                .gt_eq(lit(range.min_score))
                .and(score().lt_eq(lit(range.max_score))),
        )
        .sort(
            [SCORE_COLUMN],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .collect()?;

    tracing::debug!(
        "Score range [{}, {}]: {} of {} companies qualify",
        range.min_score,
        range.max_score,
        filtered.height(),
        table.len()
    );

    Ok(filtered)
}

/// Qualifying `(Company, Sustainability Score)` pairs, highest score first
///
/// An empty result is a valid outcome meaning no company qualifies.
pub fn rank_companies(table: &ScoredTable, range: ScoreRange) -> Result<Vec<RankedCompany>> {
    let filtered = filter_frame(table, range)?;

    let companies = text_values(&filtered, COMPANY_COLUMN)?;
    let scores = filtered.column(SCORE_COLUMN)?.f64()?;

    Ok(companies
        .into_iter()
        .zip(scores.into_iter())
        .filter_map(|(company, score)| match (company, score) {
            (Some(company), Some(score)) => Some(RankedCompany { company, score }),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MetricWeight, ScoringConfig};
    use crate::data::CompanyData;
    use crate::metrics::calculate_scores;
    use crate::utils::normalization::normalize_columns;

    /// Scores equal the raw "Impact" column (single weight of 1.0)
    fn table_with_scores(names: &[&str], scores: &[f64]) -> ScoredTable {
        let config = ScoringConfig {
            metric_schema: vec![],
            percentage_columns: vec![],
            weights: vec![MetricWeight {
                column: "Impact".to_string(),
                weight: 1.0,
            }],
            fraction_policy: Default::default(),
        };
        let frame = df![
            "Company" => names,
            "Impact" => scores,
        ]
        .unwrap();
        let normalized = normalize_columns(&CompanyData::from_frame(frame), &config).unwrap();
        calculate_scores(normalized, &config).unwrap()
    }

    fn names(ranked: &[RankedCompany]) -> Vec<&str> {
        ranked.iter().map(|r| r.company.as_str()).collect()
    }

    #[test]
    fn test_inclusive_bounds_and_order() {
        let table = table_with_scores(&["A", "B", "C", "D"], &[10.0, 40.0, 25.0, 40.5]);

        let ranked = rank_companies(&table, ScoreRange::new(10.0, 40.0)).unwrap();
        assert_eq!(names(&ranked), vec!["B", "C", "A"]);

        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_ties_keep_row_order() {
        let table = table_with_scores(&["A", "B", "C", "D"], &[5.0, 7.0, 5.0, 5.0]);

        let ranked = rank_companies(&table, ScoreRange::new(0.0, 10.0)).unwrap();
        assert_eq!(names(&ranked), vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn test_inverted_range_is_empty_not_error() {
        let table = table_with_scores(&["A", "B"], &[5.0, 7.0]);

        let range = ScoreRange::new(8.0, 2.0);
        assert!(range.is_empty());
        assert!(rank_companies(&table, range).unwrap().is_empty());

        let frame = filter_frame(&table, range).unwrap();
        assert_eq!(frame.height(), 0);
        assert_eq!(frame.width(), table.frame().width());
    }

    #[test]
    fn test_no_match_is_empty() {
        let table = table_with_scores(&["A", "B"], &[5.0, 7.0]);
        assert!(rank_companies(&table, ScoreRange::new(100.0, 200.0))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_filter_does_not_mutate_table() {
        let table = table_with_scores(&["A", "B", "C"], &[1.0, 3.0, 2.0]);
        let before = table.frame().clone();

        let filtered = filter_frame(&table, ScoreRange::new(2.0, 3.0)).unwrap();
        assert_eq!(filtered.height(), 2);
        assert!(table.frame().equals(&before));
    }

    #[test]
    fn test_range_from_bounds_selects_everything() {
        let table = table_with_scores(&["A", "B", "C"], &[-4.0, 3.0, 2.0]);
        let bounds = table.score_bounds().unwrap().unwrap();

        let ranked = rank_companies(&table, ScoreRange::from_bounds(bounds)).unwrap();
        assert_eq!(names(&ranked), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_range_contains() {
        let range = ScoreRange::new(1.0, 2.0);
        assert!(range.contains(1.0));
        assert!(range.contains(2.0));
        assert!(!range.contains(2.0001));
        assert!(ScoreRange::new(f64::NAN, 1.0).is_empty());
    }
}
