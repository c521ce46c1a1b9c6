//! Company Detail Lookup
//!
//! Returns every field of a single company as ordered key-value pairs.
//! Zero matches and duplicate matches are both recoverable misses; a
//! duplicated identifier is never resolved by picking the first row.

use crate::config::{COMPANY_COLUMN, SCORE_COLUMN};
use crate::error::{Result, ScoringError};
use crate::metrics::ScoredTable;
use crate::utils::frame_helpers::filter_rows_equal;
use polars::prelude::*;
use serde::Serialize;

/// A single cell of a detail record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DetailValue {
    Number(f64),
    Text(String),
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailField {
    pub column: String,
    pub value: DetailValue,
}

/// All fields of one company, in table column order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    pub company: String,
    pub fields: Vec<DetailField>,
}

impl CompanyDetail {
    pub fn get(&self, column: &str) -> Option<&DetailValue> {
        self.fields
            .iter()
            .find(|field| field.column == column)
            .map(|field| &field.value)
    }

    pub fn score(&self) -> Option<f64> {
        match self.get(SCORE_COLUMN) {
            Some(DetailValue::Number(score)) => Some(*score),
            _ => None,
        }
    }
}

/// Look up one company by identifier
///
/// # Errors
/// - `CompanyNotFound` if no row carries the identifier
/// - `DuplicateCompany` if more than one row does
pub fn company_detail(table: &ScoredTable, company: &str) -> Result<CompanyDetail> {
    let matches = filter_rows_equal(table.frame(), COMPANY_COLUMN, company)?;

    match matches.height() {
        0 => Err(ScoringError::CompanyNotFound {
            company: company.to_string(),
        }),
        1 => {
            let mut fields = Vec::with_capacity(matches.width());
            for column in matches.get_columns() {
                fields.push(DetailField {
                    column: column.name().to_string(),
                    value: detail_value(column.get(0)?),
                });
            }

            Ok(CompanyDetail {
                company: company.to_string(),
                fields,
            })
        }
        n => {
            tracing::warn!("Detail lookup for '{}' matched {} rows", company, n);
            Err(ScoringError::DuplicateCompany {
                company: company.to_string(),
                matches: n,
            })
        }
    }
}

fn detail_value(value: AnyValue) -> DetailValue {
    match value {
        AnyValue::Null => DetailValue::Missing,
        AnyValue::String(s) => DetailValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => DetailValue::Text(s.to_string()),
        AnyValue::Boolean(b) => DetailValue::Text(b.to_string()),
        other => match other.extract::<f64>() {
            Some(number) => DetailValue::Number(number),
            None => DetailValue::Text(other.to_string()),
        },
    }
}
