//! Field-level validation shared by the record transformers.
//!
//! Transformers never panic and never emit a partially valid record. Every
//! failure is a [`Rejection`] naming the offending field, so callers can count
//! drops by reason even though the rows themselves are discarded.

use crate::data::ingest::RawRow;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Why a row did not become a record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("field '{field}' is not a finite number: {raw:?}")]
    InvalidNumber { field: &'static str, raw: String },

    #[error("field '{field}' out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("field '{field}' is not a recognizable date: {raw:?}")]
    InvalidDate { field: &'static str, raw: String },

    #[error("outbreak start {start} is after reporting date {reported}")]
    DateOrder { start: NaiveDate, reported: NaiveDate },
}

impl Rejection {
    /// Short machine-readable reason, used as the key of rejection tallies.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::MissingField { .. } => "missing_field",
            Rejection::InvalidNumber { .. } => "invalid_number",
            Rejection::OutOfRange { .. } => "out_of_range",
            Rejection::InvalidDate { .. } => "invalid_date",
            Rejection::DateOrder { .. } => "date_order",
        }
    }
}

/// Numeric dashed and slashed dates are day-first (DD-MM-YYYY), as the
/// Indian government sources publish them; `01/02/2023` is 1 February.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%d-%b-%Y"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d-%m-%Y %H:%M"];

/// A required column: present and non-blank, or `MissingField`.
pub fn required<'a>(row: &'a RawRow, field: &'static str) -> Result<&'a str, Rejection> {
    row.get(field).ok_or(Rejection::MissingField { field })
}

/// An optional string column, trimmed, defaulting to empty.
pub fn text(row: &RawRow, field: &str) -> String {
    row.get(field).unwrap_or_default().to_string()
}

/// Parse a finite float.
pub fn parse_float(field: &'static str, raw: &str) -> Result<f64, Rejection> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Rejection::InvalidNumber {
            field,
            raw: raw.to_string(),
        }),
    }
}

/// Parse an integer. Decimal literals are accepted and truncated toward zero.
pub fn parse_int(field: &'static str, raw: &str) -> Result<i64, Rejection> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(v);
    }
    let v = parse_float(field, trimmed)?;
    if v < i64::MIN as f64 || v > i64::MAX as f64 {
        return Err(Rejection::OutOfRange { field, value: v });
    }
    Ok(v.trunc() as i64)
}

/// Parse a date in one of the accepted layouts; timestamps keep their date part.
pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, Rejection> {
    let trimmed = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(date);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt.date());
        }
    }
    Err(Rejection::InvalidDate {
        field,
        raw: raw.to_string(),
    })
}

/// Integer bounds check.
pub fn int_in(field: &'static str, value: i64, range: RangeInclusive<i64>) -> Result<i64, Rejection> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(Rejection::OutOfRange {
            field,
            value: value as f64,
        })
    }
}

/// Float bounds check.
pub fn float_in(field: &'static str, value: f64, range: RangeInclusive<f64>) -> Result<f64, Rejection> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(Rejection::OutOfRange { field, value })
    }
}

/// Narrow to `i32`, rejecting values that do not fit.
pub fn to_i32(field: &'static str, value: i64) -> Result<i32, Rejection> {
    i32::try_from(value).map_err(|_| Rejection::OutOfRange {
        field,
        value: value as f64,
    })
}

/// A count column. Absent means zero and negatives clamp to zero; a value that
/// is present but unparsable still rejects the row.
pub fn count(row: &RawRow, field: &'static str) -> Result<u64, Rejection> {
    match row.get(field) {
        None => Ok(0),
        Some(raw) => Ok(parse_int(field, raw)?.max(0) as u64),
    }
}
