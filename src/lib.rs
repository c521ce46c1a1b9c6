//! Company Sustainability Scorer
//!
//! Computes a weighted composite Sustainability Score per company from a
//! table of sustainability metrics, then filters and ranks companies by it.
//!
//! Pipeline:
//! - `data`: CSV loading with Polars
//! - `utils/`: column normalization (renames, fraction → percentage) and
//!   validated column access
//! - `metrics/`: weighted score calculation and the canonical scored table
//! - `ranking`: inclusive range filter, descending stable ranking
//! - `detail`: single-company lookup
//! - `scorer`: coordinator that runs the pipeline once per dataset

pub mod config;
pub mod data;
pub mod detail;
pub mod error;
pub mod metrics;
pub mod ranking;
pub mod scorer;
pub mod utils;

// Re-export commonly used types
pub use config::{
    ColumnRename, FractionPolicy, MetricWeight, ScoringConfig, COMPANY_COLUMN, SCORE_COLUMN,
};
pub use data::CompanyData;
pub use detail::{company_detail, CompanyDetail, DetailField, DetailValue};
pub use error::{Result, ScoringError};
pub use metrics::{calculate_scores, ScoreBounds, ScoredTable};
pub use ranking::{filter_frame, rank_companies, RankedCompany, ScoreRange};
pub use scorer::SustainabilityScorer;
pub use utils::{normalize_columns, NormalizedFrame};
