//! Scoring metrics
//!
//! The composite Sustainability Score and the canonical scored table.

pub mod sustainability_score;

pub use sustainability_score::{calculate_scores, ScoreBounds, ScoredTable};
