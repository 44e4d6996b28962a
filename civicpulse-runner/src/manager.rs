//! Data manager: the lifecycle owner of the four datasets.
//!
//! Phases move `Empty → Loading → Loaded`, and back through `Loading` on
//! reload. Exactly one orchestrated load runs at a time: callers queue on an
//! async gate, and whoever gets it after a successful load just returns. The
//! datasets sit behind a synchronous lock that is never held across `.await`.
//!
//! A load that exceeds the configured timeout is dropped (its fetches are
//! cancelled) and the sample datasets are served instead. The same happens
//! when every source comes back empty. No public operation returns an error.

use crate::config::EngineConfig;
use crate::data_loader::{LoadedData, Loader};
use crate::sample_data::sample_data;
use civicpulse_core::data::{CacheStats, ParseCache, SourceFetcher, SourceTransport};
use civicpulse_core::schema::{column_profile, ColumnInfo};
use civicpulse_core::{
    AirQualityRecord, Dataset, DatasetKind, OutbreakRecord, PopulationRecord, Record,
    VehicleRecord,
};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Lifecycle phase. `is_loading` and `is_loaded` are both derived from this,
/// so they can never be true together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Empty,
    Loading,
    Loaded,
}

/// Where the committed datasets came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Sources,
    Sample,
}

/// The two status flags reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadingStatus {
    /// A load is in flight.
    pub is_loading: bool,
    /// Datasets are committed, from sources or the sample fallback.
    pub is_loaded: bool,
}

impl From<Phase> for LoadingStatus {
    fn from(phase: Phase) -> Self {
        Self {
            is_loading: phase == Phase::Loading,
            is_loaded: phase == Phase::Loaded,
        }
    }
}

/// Counts for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub kind: DatasetKind,
    pub records: usize,
    pub rejected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

/// Point-in-time view of what the manager holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSummary {
    pub datasets: Vec<DatasetSummary>,
    pub total_records: usize,
    pub total_rejected: usize,
    pub origin: Option<DataOrigin>,
    pub failed_sources: Vec<DatasetKind>,
    pub is_loading: bool,
    pub is_loaded: bool,
}

impl DataSummary {
    pub fn records(&self, kind: DatasetKind) -> usize {
        self.datasets
            .iter()
            .find(|d| d.kind == kind)
            .map_or(0, |d| d.records)
    }
}

struct State {
    phase: Phase,
    data: Option<LoadedData>,
    origin: Option<DataOrigin>,
}

impl State {
    fn empty() -> Self {
        Self {
            phase: Phase::Empty,
            data: None,
            origin: None,
        }
    }
}

/// Rolls `Loading` back to `Empty` if the load future is dropped before it commits.
struct LoadingGuard<'a> {
    state: &'a RwLock<State>,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.state.write();
            if state.phase == Phase::Loading {
                warn!("load cancelled before completion; resetting to empty");
                state.phase = Phase::Empty;
            }
        }
    }
}

/// Owns the four datasets and the load that fills them.
pub struct DataManager {
    loader: Loader,
    /// Upper bound on one orchestrated load before falling back to samples.
    load_timeout: Duration,
    /// Serializes loads; held across `.await`.
    gate: tokio::sync::Mutex<()>,
    /// Never held across `.await`.
    state: RwLock<State>,
}

impl DataManager {
    pub fn new(loader: Loader, load_timeout: Duration) -> Self {
        Self {
            loader,
            load_timeout,
            gate: tokio::sync::Mutex::new(()),
            state: RwLock::new(State::empty()),
        }
    }

    /// Wire a manager from configuration over the given transport.
    pub fn from_config(config: &EngineConfig, transport: Arc<dyn SourceTransport>) -> Self {
        let fetcher = SourceFetcher::new(transport, config.retry.policy());
        let loader = Loader::new(fetcher, Arc::new(ParseCache::new()), config.sources.clone());
        Self::new(loader, config.load_timeout())
    }

    /// Load every dataset once. Returns immediately when already loaded;
    /// concurrent callers share a single load.
    pub async fn load_all_data(&self) {
        if self.is_data_loaded() {
            return;
        }
        let _gate = self.gate.lock().await;
        if self.is_data_loaded() {
            return;
        }
        self.run_load().await;
    }

    /// Drop everything (parse cache included) and load again.
    pub async fn reload(&self) {
        let _gate = self.gate.lock().await;
        info!("reloading all datasets");
        self.loader.clear_cache();
        *self.state.write() = State::empty();
        self.run_load().await;
    }

    /// Caller must hold the gate.
    async fn run_load(&self) {
        self.state.write().phase = Phase::Loading;
        let mut guard = LoadingGuard {
            state: &self.state,
            armed: true,
        };

        let (data, origin) = match tokio::time::timeout(self.load_timeout, self.loader.load_all()).await {
            Ok(loaded) if loaded.is_empty() => {
                warn!(
                    failed = loaded.failures.len(),
                    "every source came back empty; serving sample data"
                );
                let mut sample = sample_data();
                sample.failures = loaded.failures;
                (sample, DataOrigin::Sample)
            }
            Ok(loaded) => (loaded, DataOrigin::Sources),
            Err(_) => {
                warn!(
                    timeout_secs = self.load_timeout.as_secs_f64(),
                    "load timed out; serving sample data"
                );
                (sample_data(), DataOrigin::Sample)
            }
        };

        let total = data.total_records();
        {
            let mut state = self.state.write();
            state.data = Some(data);
            state.origin = Some(origin);
            state.phase = Phase::Loaded;
        }
        guard.armed = false;
        info!(records = total, origin = ?origin, "data manager loaded");
    }

    // ─── Accessors ──────────────────────────────────────────────────

    pub fn vehicle_data(&self) -> Arc<Dataset<VehicleRecord>> {
        self.dataset(|d| d.vehicle.clone())
    }

    pub fn outbreak_data(&self) -> Arc<Dataset<OutbreakRecord>> {
        self.dataset(|d| d.outbreak.clone())
    }

    pub fn population_data(&self) -> Arc<Dataset<PopulationRecord>> {
        self.dataset(|d| d.population.clone())
    }

    pub fn air_quality_data(&self) -> Arc<Dataset<AirQualityRecord>> {
        self.dataset(|d| d.air_quality.clone())
    }

    fn dataset<R: Record>(&self, pick: impl FnOnce(&LoadedData) -> Arc<Dataset<R>>) -> Arc<Dataset<R>> {
        let state = self.state.read();
        match &state.data {
            Some(data) => pick(data),
            None => {
                warn!(
                    source = R::KIND.source_key(),
                    phase = ?state.phase,
                    "dataset read before load completed; returning empty"
                );
                Arc::new(Dataset::empty(R::KIND.source_key()))
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.read().phase
    }

    pub fn is_data_loaded(&self) -> bool {
        self.phase() == Phase::Loaded
    }

    pub fn loading_status(&self) -> LoadingStatus {
        self.phase().into()
    }

    pub fn data_origin(&self) -> Option<DataOrigin> {
        self.state.read().origin
    }

    pub fn data_summary(&self) -> DataSummary {
        let state = self.state.read();
        let status = LoadingStatus::from(state.phase);

        let (datasets, failed_sources) = match &state.data {
            Some(data) => (
                vec![
                    summarize(&data.vehicle),
                    summarize(&data.outbreak),
                    summarize(&data.population),
                    summarize(&data.air_quality),
                ],
                data.failures.iter().map(|(kind, _)| *kind).collect(),
            ),
            None => (
                DatasetKind::ALL
                    .iter()
                    .map(|&kind| DatasetSummary {
                        kind,
                        records: 0,
                        rejected: 0,
                        content_hash: None,
                    })
                    .collect(),
                Vec::new(),
            ),
        };

        DataSummary {
            total_records: datasets.iter().map(|d| d.records).sum(),
            total_rejected: datasets.iter().map(|d| d.rejected).sum(),
            datasets,
            origin: state.origin,
            failed_sources,
            is_loading: status.is_loading,
            is_loaded: status.is_loaded,
        }
    }

    /// Column types, distinct values and summary statistics for one dataset.
    pub fn column_profile(&self, kind: DatasetKind) -> Vec<ColumnInfo> {
        match kind {
            DatasetKind::Vehicle => column_profile(self.vehicle_data().records()),
            DatasetKind::Outbreak => column_profile(self.outbreak_data().records()),
            DatasetKind::Population => column_profile(self.population_data().records()),
            DatasetKind::AirQuality => column_profile(self.air_quality_data().records()),
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.loader.cache_stats()
    }
}

fn summarize<R: Record>(dataset: &Dataset<R>) -> DatasetSummary {
    DatasetSummary {
        kind: R::KIND,
        records: dataset.len(),
        rejected: dataset.rejected(),
        content_hash: dataset.content_hash().map(|h| h.to_string()),
    }
}
