//! Sustainability Score
//!
//! Weighted linear combination of a company's normalized metrics:
//!
//! ```text
//! score = Σ row[column] × weight   over (column, weight) in the Weight Table
//! ```
//!
//! Summation follows Weight Table order, so recomputing a score from the
//! stored metrics reproduces it exactly.

use crate::config::{MetricWeight, ScoringConfig, COMPANY_COLUMN, SCORE_COLUMN};
use crate::error::{Result, ScoringError};
use crate::utils::frame_helpers::{metric_values, text_values};
use crate::utils::normalization::NormalizedFrame;
use polars::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

/// Observed score range of a scored table (default filter bounds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBounds {
    pub min: f64,
    pub max: f64,
}

/// Canonical scored table
///
/// Built once per load and never mutated afterwards; filtering and lookups
/// produce derived copies.
#[derive(Debug, Clone)]
pub struct ScoredTable {
    frame: DataFrame,
    weights: Vec<MetricWeight>,
}

/// Compute the Sustainability Score for every row
///
/// # Errors
/// - `MissingMetric` if a Weight Table key is not a column
/// - `InvalidMetricValue` for the first unusable weighted cell (the whole
///   computation fails; no row is skipped or zeroed)
pub fn calculate_scores(normalized: NormalizedFrame, config: &ScoringConfig) -> Result<ScoredTable> {
    let mut frame = normalized.into_inner();

    if frame.get_column_index(SCORE_COLUMN).is_some() {
        return Err(ScoringError::DuplicateColumn {
            column: SCORE_COLUMN.to_string(),
        });
    }

    let scores = weighted_sum(&frame, &config.weights)?;
    frame.with_column(Series::new(SCORE_COLUMN.into(), scores))?;

    let table = ScoredTable {
        frame,
        weights: config.weights.clone(),
    };

    let duplicates = table.duplicate_companies()?;
    if !duplicates.is_empty() {
        tracing::warn!(
            "Scored table has {} duplicated company identifiers: {:?}",
            duplicates.len(),
            duplicates
        );
    }

    tracing::info!(
        "Scored {} companies with {} weighted metrics",
        table.len(),
        table.weights.len()
    );

    Ok(table)
}

/// Per-row weighted sum in Weight Table order
fn weighted_sum(frame: &DataFrame, weights: &[MetricWeight]) -> Result<Vec<f64>> {
    // Validate every column before reading any values
    for metric in weights {
        if frame.get_column_index(&metric.column).is_none() {
            return Err(ScoringError::MissingMetric {
                column: metric.column.clone(),
            });
        }
    }

    let mut scores = vec![0.0; frame.height()];
    for metric in weights {
        let values = metric_values(frame, &metric.column)?;
        for (score, value) in scores.iter_mut().zip(values) {
            *score += value * metric.weight;
        }
    }

    Ok(scores)
}

impl ScoredTable {
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of scored companies
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn weights(&self) -> &[MetricWeight] {
        &self.weights
    }

    /// Stored scores in row order
    pub fn scores(&self) -> Result<Vec<f64>> {
        Ok(self
            .frame
            .column(SCORE_COLUMN)?
            .f64()?
            .into_iter()
            .map(|opt| opt.unwrap_or(f64::NAN))
            .collect())
    }

    /// Recompute every score from the stored metrics and weights
    pub fn recompute_scores(&self) -> Result<Vec<f64>> {
        weighted_sum(&self.frame, &self.weights)
    }

    /// Lowest and highest score, `None` for an empty table
    pub fn score_bounds(&self) -> Result<Option<ScoreBounds>> {
        let scores = self.scores()?;
        let bounds = scores.iter().copied().fold(None, |acc: Option<ScoreBounds>, s| {
            Some(match acc {
                None => ScoreBounds { min: s, max: s },
                Some(b) => ScoreBounds {
                    min: b.min.min(s),
                    max: b.max.max(s),
                },
            })
        });
        Ok(bounds)
    }

    /// Distinct company identifiers in first-appearance order
    pub fn company_names(&self) -> Result<Vec<String>> {
        let mut seen = FxHashSet::default();
        let mut names = Vec::new();
        for name in text_values(&self.frame, COMPANY_COLUMN)?.into_iter().flatten() {
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Identifiers that appear on more than one row
    pub fn duplicate_companies(&self) -> Result<Vec<String>> {
        let mut counts: FxHashMap<String, usize> = FxHashMap::default();
        for name in text_values(&self.frame, COMPANY_COLUMN)?.into_iter().flatten() {
            *counts.entry(name).or_insert(0) += 1;
        }

        Ok(self
            .company_names()?
            .into_iter()
            .filter(|name| counts.get(name).copied().unwrap_or(0) > 1)
            .collect())
    }
}
