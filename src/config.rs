//! Scoring Configuration
//!
//! The Metric Schema (raw → display column names), the Percentage Metric Set
//! and the Weight Table, bundled into one immutable structure that is handed
//! to the normalizer and the score calculator.
//!
//! `ScoringConfig::default()` is the fixed production table. A JSON file with
//! the same shape can be loaded once at startup with `ScoringConfig::load`.

use crate::error::{Result, ScoringError};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Identifier column, passed through unchanged by the Metric Schema
pub const COMPANY_COLUMN: &str = "Company";

/// Derived column appended by the score calculator
pub const SCORE_COLUMN: &str = "Sustainability Score";

/// One entry of the Metric Schema
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColumnRename {
    pub raw: String,
    pub display: String,
}

/// One entry of the Weight Table
///
/// Negative weights mark metrics where a lower value is better (waste, emissions).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetricWeight {
    pub column: String,
    pub weight: f64,
}

/// How percentage columns are checked before the ×100 rescale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FractionPolicy {
    /// Reject values outside [0, 1] (already-percentage data would be rescaled twice)
    #[default]
    Strict,
    /// Rescale without checking; the caller guarantees fraction-scale input
    Trusted,
}

/// Complete scoring configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScoringConfig {
    pub metric_schema: Vec<ColumnRename>,
    pub percentage_columns: Vec<String>,
    pub weights: Vec<MetricWeight>,
    #[serde(default)]
    pub fraction_policy: FractionPolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let metric_schema = [
            ("Local Business Engagement Rate", "Local Business Engagement Rate (%)"),
            ("Remote Worker Attraction Rate", "Remote Worker Attraction Rate (%)"),
            ("Waste Development Rate", "Waste Development Rate (tons/year)"),
            ("Emission Rate of Pollutant per kg", "Emission Rate of Pollutant (kg)"),
            ("Regenerating High Value Material", "Regenerating High Value Material (%)"),
            ("Extend Product Life", "Extend Product Life (years)"),
            ("Share, Resale", "Share/Resale Rate (%)"),
            ("Circular Credibility", "Circular Credibility Score"),
            ("Value of Waste", "Value of Waste (EUR)"),
        ]
        .into_iter()
        .map(|(raw, display)| ColumnRename {
            raw: raw.to_string(),
            display: display.to_string(),
        })
        .collect();

        let percentage_columns = [
            "Local Business Engagement Rate (%)",
            "Remote Worker Attraction Rate (%)",
            "End of Life Score",
            "Circular Credibility Score",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let weights = [
            ("Sustainability Impact Score", 0.15),
            ("Local Business Engagement Rate (%)", 0.10),
            ("Remote Worker Attraction Rate (%)", 0.10),
            ("Waste Development Rate (tons/year)", -0.10),
            ("Emission Rate of Pollutant (kg)", -0.15),
            ("Regenerating High Value Material (%)", 0.10),
            ("Extend Product Life (years)", 0.10),
            ("Share/Resale Rate (%)", 0.05),
            ("End of Life Score", 0.05),
            ("Circular Credibility Score", 0.10),
            ("Value of Waste (EUR)", 0.10),
        ]
        .into_iter()
        .map(|(column, weight)| MetricWeight {
            column: column.to_string(),
            weight,
        })
        .collect();

        Self {
            metric_schema,
            percentage_columns,
            weights,
            fraction_policy: FractionPolicy::default(),
        }
    }
}

impl ScoringConfig {
    /// Load configuration from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ScoringError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: ScoringConfig = serde_json::from_str(&contents)?;
        config.validate()?;

        tracing::info!(
            "Loaded scoring config from {:?} ({} renames, {} weights)",
            path,
            config.metric_schema.len(),
            config.weights.len()
        );

        Ok(config)
    }

    /// Check internal consistency
    ///
    /// Column existence against a dataset is checked later, by the normalizer
    /// and the score calculator.
    pub fn validate(&self) -> Result<()> {
        if self.weights.is_empty() {
            return Err(ScoringError::InvalidConfig(
                "weight table is empty".to_string(),
            ));
        }

        let mut raw_names = FxHashSet::default();
        let mut display_names = FxHashSet::default();
        for rename in &self.metric_schema {
            if !raw_names.insert(rename.raw.as_str()) {
                return Err(ScoringError::InvalidConfig(format!(
                    "raw column '{}' is renamed twice",
                    rename.raw
                )));
            }
            if !display_names.insert(rename.display.as_str()) {
                return Err(ScoringError::InvalidConfig(format!(
                    "display column '{}' is produced twice",
                    rename.display
                )));
            }
        }

        // Renames are applied one after another, so a display name may not be
        // another entry's raw name
        for rename in &self.metric_schema {
            if rename.raw != rename.display && raw_names.contains(rename.display.as_str()) {
                return Err(ScoringError::InvalidConfig(format!(
                    "display column '{}' is also renamed; chained renames are not supported",
                    rename.display
                )));
            }
        }

        // Percentage columns refer to post-rename names
        for column in &self.percentage_columns {
            if raw_names.contains(column.as_str()) && !display_names.contains(column.as_str()) {
                return Err(ScoringError::InvalidConfig(format!(
                    "percentage column '{}' uses a raw name; use its display name",
                    column
                )));
            }
        }

        let mut weighted = FxHashSet::default();
        for metric in &self.weights {
            if !metric.weight.is_finite() {
                return Err(ScoringError::InvalidConfig(format!(
                    "weight for '{}' is not finite",
                    metric.column
                )));
            }
            if !weighted.insert(metric.column.as_str()) {
                return Err(ScoringError::InvalidConfig(format!(
                    "column '{}' is weighted twice",
                    metric.column
                )));
            }
        }

        Ok(())
    }

    /// Weight for a display column, if it is part of the Weight Table
    pub fn weight_of(&self, column: &str) -> Option<f64> {
        self.weights
            .iter()
            .find(|metric| metric.column == column)
            .map(|metric| metric.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_tables() {
        let config = ScoringConfig::default();
        assert_eq!(config.metric_schema.len(), 9);
        assert_eq!(config.percentage_columns.len(), 4);
        assert_eq!(config.weights.len(), 11);
        assert_eq!(config.fraction_policy, FractionPolicy::Strict);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_weights_balance() {
        let config = ScoringConfig::default();
        let total: f64 = config.weights.iter().map(|m| m.weight).sum();
        let magnitude: f64 = config.weights.iter().map(|m| m.weight.abs()).sum();
        assert_relative_eq!(total, 0.6, epsilon = 1e-12);
        assert_relative_eq!(magnitude, 1.1, epsilon = 1e-12);
        assert_relative_eq!(
            config.weight_of("Emission Rate of Pollutant (kg)").unwrap(),
            -0.15
        );
        assert!(config.weight_of("Company").is_none());
    }

    #[test]
    fn test_weight_keys_match_normalized_names() {
        let config = ScoringConfig::default();
        let displays: Vec<&str> = config
            .metric_schema
            .iter()
            .map(|r| r.display.as_str())
            .collect();
        for metric in &config.weights {
            let known = displays.contains(&metric.column.as_str())
                || metric.column == "Sustainability Impact Score"
                || metric.column == "End of Life Score";
            assert!(known, "unexpected weight key {}", metric.column);
        }
    }

    #[test]
    fn test_json_roundtrip_defaults_policy() {
        let json = r#"{
            "metric_schema": [{"raw": "Share, Resale", "display": "Share/Resale Rate (%)"}],
            "percentage_columns": ["Share/Resale Rate (%)"],
            "weights": [{"column": "Share/Resale Rate (%)", "weight": 1.0}]
        }"#;
        let config: ScoringConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.fraction_policy, FractionPolicy::Strict);
        assert!(config.validate().is_ok());

        let trusted = r#"{
            "metric_schema": [],
            "percentage_columns": [],
            "weights": [{"column": "A", "weight": 1.0}],
            "fraction_policy": "trusted"
        }"#;
        let config: ScoringConfig = serde_json::from_str(trusted).unwrap();
        assert_eq!(config.fraction_policy, FractionPolicy::Trusted);
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        let mut config = ScoringConfig::default();
        config.weights.clear();
        assert!(matches!(
            config.validate(),
            Err(ScoringError::InvalidConfig(_))
        ));

        let mut config = ScoringConfig::default();
        config.weights[0].weight = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = ScoringConfig::default();
        config.percentage_columns.push("Share, Resale".to_string());
        assert!(config.validate().is_err());

        let mut config = ScoringConfig::default();
        let first = config.metric_schema[0].clone();
        config.metric_schema.push(first);
        assert!(config.validate().is_err());

        let mut config = ScoringConfig::default();
        config.metric_schema.push(ColumnRename {
            raw: "Value of Waste (EUR)".to_string(),
            display: "Waste Value".to_string(),
        });
        assert!(matches!(
            config.validate(),
            Err(ScoringError::InvalidConfig(msg)) if msg.contains("Value of Waste (EUR)")
        ));

        let mut config = ScoringConfig::default();
        let first = config.weights[0].clone();
        config.weights.push(first);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ScoringConfig::load(Path::new("/nonexistent/scoring.json")).unwrap_err();
        assert!(matches!(err, ScoringError::Io { .. }));
    }
}
