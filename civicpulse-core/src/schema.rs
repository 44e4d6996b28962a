//! Column layout per record kind and the column profile built from it.
//!
//! The profile is what the presentation layer uses to decide how to chart a
//! column: categorical columns carry their distinct values, numeric columns
//! carry summary statistics.

use crate::domain::Record;
use crate::stats::{self, SummaryStats};
use serde::{Deserialize, Serialize};

/// How a column should be treated downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Categorical,
    Numeric,
    Date,
    Text,
}

/// A single column in a record kind's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub column_type: ColumnType,
}

impl ColumnSpec {
    pub const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self { name, column_type }
    }
}

/// Profile of one column over a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub column_type: ColumnType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SummaryStats>,
}

/// Profile every column of `R` over `records`.
pub fn column_profile<R: Record>(records: &[R]) -> Vec<ColumnInfo> {
    R::COLUMNS
        .iter()
        .map(|spec| {
            let (unique_values, stats) = match spec.column_type {
                ColumnType::Categorical => (Some(stats::unique_strings(records, spec.name)), None),
                ColumnType::Numeric => (
                    None,
                    Some(stats::describe(&stats::column_values(records, spec.name))),
                ),
                ColumnType::Date | ColumnType::Text => (None, None),
            };
            ColumnInfo {
                name: spec.name.to_string(),
                column_type: spec.column_type,
                unique_values,
                stats,
            }
        })
        .collect()
}
