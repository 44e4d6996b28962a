//! Delimited text → generic rows → validated dataset.
//!
//! Headers are normalized (trimmed, lower-cased, whitespace runs → `_`) before
//! lookup. A malformed row is logged and skipped; it never aborts the batch.

use crate::domain::{Dataset, DatasetHash, Record};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from the CSV layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    #[error("unreadable header row: {0}")]
    Header(String),

    #[error("malformed row at line {line}: {message}")]
    MalformedRow { line: u64, message: String },
}

/// One untyped row, keyed by normalized column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    /// Build a row from `(column, value)` pairs. Column names are normalized.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (normalize_header(k.as_ref()), v.into()))
                .collect(),
        }
    }

    /// Trimmed value of a column; blank values count as absent.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Rows parsed from one resource plus the rows that could not be read.
#[derive(Debug, Default)]
pub struct ParsedRows {
    pub rows: Vec<RawRow>,
    pub malformed: Vec<IngestError>,
}

/// `" Vehicle  Class "` → `"vehicle_class"`.
pub fn normalize_header(header: &str) -> String {
    header
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Split delimited text into rows keyed by the normalized header.
///
/// Records shorter than the header leave the trailing columns absent; extra
/// trailing fields are ignored. Blank lines are skipped.
pub fn parse_rows(text: &str) -> Result<ParsedRows, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    // A column whose normalized name repeats an earlier one is dropped.
    let mut seen = HashSet::new();
    let headers: Vec<Option<String>> = reader
        .headers()
        .map_err(|e| IngestError::Header(e.to_string()))?
        .iter()
        .map(normalize_header)
        .map(|name| {
            if name.is_empty() {
                None
            } else if seen.insert(name.clone()) {
                Some(name)
            } else {
                warn!(column = %name, "duplicate header; keeping the first column");
                None
            }
        })
        .collect();

    let mut parsed = ParsedRows::default();
    for result in reader.records() {
        match result {
            Ok(record) => {
                let fields = headers
                    .iter()
                    .zip(record.iter())
                    .filter_map(|(name, value)| Some((name.clone()?, value.to_string())))
                    .collect();
                parsed.rows.push(RawRow { fields });
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                parsed.malformed.push(IngestError::MalformedRow {
                    line,
                    message: e.to_string(),
                });
            }
        }
    }
    Ok(parsed)
}

/// Parse `text` and run every row through `R`'s transformer.
///
/// Rejected rows are dropped and tallied by reason on the returned dataset.
pub fn parse_dataset<R: Record>(source: &str, text: &str) -> Dataset<R> {
    let hash = DatasetHash::of(text);
    if text.trim().is_empty() {
        return Dataset::empty(source).with_hash(hash);
    }

    let parsed = match parse_rows(text) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(source, error = %e, "could not read header; dataset is empty");
            return Dataset::empty(source).with_hash(hash);
        }
    };

    for err in &parsed.malformed {
        warn!(source, error = %err, "skipping malformed row");
    }

    let rows_seen = parsed.rows.len() + parsed.malformed.len();
    let mut records = Vec::with_capacity(parsed.rows.len());
    let mut rejections: BTreeMap<&'static str, usize> = BTreeMap::new();
    if !parsed.malformed.is_empty() {
        rejections.insert("malformed_row", parsed.malformed.len());
    }

    for row in &parsed.rows {
        match R::from_row(row) {
            Ok(record) => records.push(record),
            Err(rejection) => {
                debug!(source, reason = rejection.reason(), %rejection, "row rejected");
                *rejections.entry(rejection.reason()).or_default() += 1;
            }
        }
    }

    Dataset::from_parts(source, records, rows_seen, rejections).with_hash(hash)
}
