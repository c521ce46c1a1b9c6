//! Utility modules for the scoring pipeline
//!
//! - Normalization: Metric Schema renames and fraction → percentage rescaling
//! - Frame helpers: validated column extraction and row filtering

pub mod frame_helpers;
pub mod normalization;

pub use frame_helpers::{filter_rows_equal, metric_values, text_values};
pub use normalization::{normalize_columns, NormalizedFrame};
