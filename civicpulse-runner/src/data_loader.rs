//! Load orchestration for the four sources.
//!
//! Fetches and parses every source concurrently on the calling task and waits
//! for all of them. A source that fails degrades to an empty dataset on its
//! own; the other three are unaffected:
//! 1. Fetch the raw text (retrying per the fetcher's policy)
//! 2. Parse and validate through the parse cache
//! 3. On fetch failure → log, record the failure, substitute an empty dataset

use crate::config::SourcePaths;
use civicpulse_core::data::{CacheStats, FetchError, ParseCache, SourceFetcher};
use civicpulse_core::{
    AirQualityRecord, Dataset, DatasetKind, OutbreakRecord, PopulationRecord, Record,
    VehicleRecord,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

/// Why a single source contributed no data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

/// Result of one orchestrated load.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub vehicle: Arc<Dataset<VehicleRecord>>,
    pub outbreak: Arc<Dataset<OutbreakRecord>>,
    pub population: Arc<Dataset<PopulationRecord>>,
    pub air_quality: Arc<Dataset<AirQualityRecord>>,
    /// Sources that failed, in load order.
    pub failures: Vec<(DatasetKind, SourceError)>,
}

impl LoadedData {
    pub fn total_records(&self) -> usize {
        self.vehicle.len() + self.outbreak.len() + self.population.len() + self.air_quality.len()
    }

    /// True when no source produced a single record.
    pub fn is_empty(&self) -> bool {
        self.total_records() == 0
    }
}

/// Fetches, parses and caches the four datasets.
pub struct Loader {
    fetcher: SourceFetcher,
    cache: Arc<ParseCache>,
    sources: SourcePaths,
}

impl Loader {
    pub fn new(fetcher: SourceFetcher, cache: Arc<ParseCache>, sources: SourcePaths) -> Self {
        Self {
            fetcher,
            cache,
            sources,
        }
    }

    pub fn sources(&self) -> &SourcePaths {
        &self.sources
    }

    /// Load every source. Never fails as a whole.
    pub async fn load_all(&self) -> LoadedData {
        let started = Instant::now();
        info!(transport = self.fetcher.transport_name(), "loading all datasets");

        let (vehicle, outbreak, population, air_quality) = tokio::join!(
            self.load_one::<VehicleRecord>(),
            self.load_one::<OutbreakRecord>(),
            self.load_one::<PopulationRecord>(),
            self.load_one::<AirQualityRecord>(),
        );

        let mut failures = Vec::new();
        let vehicle = settle(vehicle, &mut failures);
        let outbreak = settle(outbreak, &mut failures);
        let population = settle(population, &mut failures);
        let air_quality = settle(air_quality, &mut failures);

        let loaded = LoadedData {
            vehicle,
            outbreak,
            population,
            air_quality,
            failures,
        };
        info!(
            vehicle = loaded.vehicle.len(),
            outbreak = loaded.outbreak.len(),
            population = loaded.population.len(),
            air_quality = loaded.air_quality.len(),
            failed = loaded.failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "all datasets loaded"
        );
        loaded
    }

    async fn load_one<R: Record>(&self) -> Result<Arc<Dataset<R>>, SourceError> {
        let key = R::KIND.source_key();
        let path = self.sources.path_for(R::KIND);
        let raw = self.fetcher.fetch(path).await?;
        let dataset = self.cache.get_or_parse::<R>(key, &raw);
        info!(
            source = key,
            records = dataset.len(),
            rejected = dataset.rejected(),
            "dataset ready"
        );
        Ok(dataset)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn settle<R: Record>(
    result: Result<Arc<Dataset<R>>, SourceError>,
    failures: &mut Vec<(DatasetKind, SourceError)>,
) -> Arc<Dataset<R>> {
    match result {
        Ok(dataset) => dataset,
        Err(e) => {
            error!(source = R::KIND.source_key(), error = %e, "source failed; using empty dataset");
            failures.push((R::KIND, e));
            Arc::new(Dataset::empty(R::KIND.source_key()))
        }
    }
}
