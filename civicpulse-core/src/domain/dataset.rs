//! An ordered, read-only sequence of one record kind plus provenance.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// BLAKE3 hash of the raw text a dataset was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    pub fn of(text: &str) -> Self {
        Self(blake3::hash(text.as_bytes()).to_hex().to_string())
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated records from one source.
///
/// Created once per load and replaced wholesale on reload; nothing mutates a
/// dataset after construction.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset<R> {
    source: String,
    records: Vec<R>,
    rows_seen: usize,
    rejections: BTreeMap<&'static str, usize>,
    content_hash: Option<DatasetHash>,
}

impl<R> Dataset<R> {
    pub fn empty(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            records: Vec::new(),
            rows_seen: 0,
            rejections: BTreeMap::new(),
            content_hash: None,
        }
    }

    /// Dataset built directly from already-valid records.
    pub fn from_records(source: impl Into<String>, records: Vec<R>) -> Self {
        let rows_seen = records.len();
        Self {
            source: source.into(),
            records,
            rows_seen,
            rejections: BTreeMap::new(),
            content_hash: None,
        }
    }

    pub(crate) fn from_parts(
        source: impl Into<String>,
        records: Vec<R>,
        rows_seen: usize,
        rejections: BTreeMap<&'static str, usize>,
    ) -> Self {
        Self {
            source: source.into(),
            records,
            rows_seen,
            rejections,
            content_hash: None,
        }
    }

    pub(crate) fn with_hash(mut self, hash: DatasetHash) -> Self {
        self.content_hash = Some(hash);
        self
    }

    /// Source key this dataset was loaded under.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows read from the source, valid or not.
    pub fn rows_seen(&self) -> usize {
        self.rows_seen
    }

    /// Rows dropped during validation or CSV parsing.
    pub fn rejected(&self) -> usize {
        self.rejections.values().sum()
    }

    /// Dropped-row tally keyed by rejection reason.
    pub fn rejections(&self) -> &BTreeMap<&'static str, usize> {
        &self.rejections
    }

    pub fn content_hash(&self) -> Option<&DatasetHash> {
        self.content_hash.as_ref()
    }
}

impl<'a, R> IntoIterator for &'a Dataset<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
