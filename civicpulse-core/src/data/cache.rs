//! In-memory parse cache keyed by source.
//!
//! Holds each source's transformed dataset so repeated loads skip CSV parsing
//! and validation. Entries are never evicted; `clear` drops them all.

use super::ingest::parse_dataset;
use crate::domain::{Dataset, Record};
use parking_lot::RwLock;
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

type Entry = Arc<dyn Any + Send + Sync>;

/// Snapshot of what the cache currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    /// Sorted.
    pub keys: Vec<String>,
}

/// Transformed datasets keyed by source name, shared by every loader.
#[derive(Default)]
pub struct ParseCache {
    /// Each value is an `Arc<Dataset<R>>` for the record kind stored under that key.
    entries: RwLock<HashMap<String, Entry>>,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached dataset for `key`, or parse `raw` as `R`, store it and return it.
    ///
    /// A hit never looks at `raw`.
    pub fn get_or_parse<R: Record>(&self, key: &str, raw: &str) -> Arc<Dataset<R>> {
        if let Some(hit) = self.lookup::<R>(key) {
            debug!(source = key, records = hit.len(), "parse cache hit");
            return hit;
        }

        let parsed: Arc<Dataset<R>> = Arc::new(parse_dataset(key, raw));
        debug!(
            source = key,
            records = parsed.len(),
            rejected = parsed.rejected(),
            "parsed and cached"
        );

        let mut entries = self.entries.write();
        // Another caller may have parsed the same key meanwhile; keep the first.
        if let Some(existing) = entries.get(key).and_then(|e| e.clone().downcast::<Dataset<R>>().ok()) {
            return existing;
        }
        entries.insert(key.to_string(), parsed.clone() as Entry);
        parsed
    }

    fn lookup<R: Record>(&self, key: &str) -> Option<Arc<Dataset<R>>> {
        let entry = self.entries.read().get(key).cloned()?;
        match entry.downcast::<Dataset<R>>() {
            Ok(ds) => Some(ds),
            Err(_) => {
                warn!(source = key, "cached entry holds a different record kind; reparsing");
                None
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        debug!(entries = entries.len(), "parse cache cleared");
        entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: keys.len(),
            keys,
        }
    }
}
