//! Integration tests for the data manager lifecycle.
//!
//! Drives a `DataManager` over in-memory transports with tokio's paused clock,
//! covering load deduplication, timeout fallback, cancellation, reload and the
//! summary surface.

use async_trait::async_trait;
use civicpulse_core::data::{SourceTransport, TransportError};
use civicpulse_core::schema::ColumnType;
use civicpulse_core::DatasetKind;
use civicpulse_runner::{DataManager, DataOrigin, EngineConfig, LoadingStatus, Phase};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ── Test transport ───────────────────────────────────────────────────

/// Serves files from a mutable map, optionally after a delay, counting calls.
struct FakeHost {
    files: Mutex<HashMap<String, String>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeHost {
    fn new(files: &[(&str, &str)], delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            files: Mutex::new(
                files
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    fn put(&self, path: &str, body: &str) {
        self.files.lock().insert(path.to_string(), body.to_string());
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceTransport for FakeHost {
    fn name(&self) -> &str {
        "fake"
    }

    async fn get(&self, path: &str) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| TransportError::NotFound { path: path.into() })
    }
}

const VAHAN: &str = "\
State,District,Vehicle Class,Fuel,Year,Month,Value
Goa,North Goa,Car,Petrol,2023,1,400
Goa,South Goa,Car,Diesel,2023,1,300
Goa,South Goa,Car,Diesel,2023,14,300
";
const IDSP: &str = "\
State,District,Disease Illness Name,Outbreak Starting Date,Reporting Date,Cases,Deaths,Status
Goa,North Goa,Dengue,2023-05-01,2023-05-03,12,0,Active
";
const POPULATION: &str = "\
State,District,Gender,Year,Value
Goa,North Goa,Male,2023,420000
Goa,North Goa,Female,2023,410000
";
const AQI: &str = "\
State,Area,Date,AQI Value,Air Quality Status,Prominent Pollutants,Number of Monitoring Stations
Goa,Panaji,2023-05-01,48,Good,PM10,2
";

fn all_files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("/data/vahan.csv", VAHAN),
        ("/data/idsp.csv", IDSP),
        ("/data/population_projection.csv", POPULATION),
        ("/data/aqi.csv", AQI),
    ]
}

fn manager(host: Arc<FakeHost>) -> DataManager {
    let config = EngineConfig::from_toml_str("[retry]\nbase_delay_ms = 100\n").unwrap();
    DataManager::from_config(&config, host)
}

// ── Reads before load ────────────────────────────────────────────────

#[tokio::test]
async fn reads_before_load_are_empty() {
    let m = manager(FakeHost::new(&all_files(), Duration::ZERO));
    assert!(m.vehicle_data().is_empty());
    assert!(m.air_quality_data().is_empty());
    assert_eq!(m.phase(), Phase::Empty);

    let summary = m.data_summary();
    assert_eq!(summary.total_records, 0);
    assert_eq!(summary.origin, None);
    assert!(!summary.is_loaded && !summary.is_loading);
}

// ── Successful load ──────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn load_commits_source_data() {
    let m = manager(FakeHost::new(&all_files(), Duration::ZERO));
    m.load_all_data().await;

    assert!(m.is_data_loaded());
    assert_eq!(m.data_origin(), Some(DataOrigin::Sources));
    assert_eq!(m.vehicle_data().len(), 2);
    assert_eq!(m.outbreak_data().len(), 1);
    assert_eq!(m.population_data().len(), 2);
    assert_eq!(m.air_quality_data().len(), 1);

    let summary = m.data_summary();
    assert_eq!(summary.total_records, 6);
    assert_eq!(summary.total_rejected, 1);
    assert_eq!(summary.records(DatasetKind::Vehicle), 2);
    assert!(summary.failed_sources.is_empty());
    assert_eq!(
        m.loading_status(),
        LoadingStatus {
            is_loading: false,
            is_loaded: true
        }
    );
}

#[tokio::test(start_paused = true)]
async fn second_load_is_a_no_op() {
    let host = FakeHost::new(&all_files(), Duration::ZERO);
    let m = manager(host.clone());
    m.load_all_data().await;
    let first = m.vehicle_data();
    m.load_all_data().await;
    assert_eq!(host.calls(), 4);
    assert!(Arc::ptr_eq(&first, &m.vehicle_data()));
}

#[tokio::test(start_paused = true)]
async fn concurrent_loads_share_one_fetch_per_source() {
    let host = FakeHost::new(&all_files(), Duration::from_millis(500));
    let m = manager(host.clone());

    tokio::join!(m.load_all_data(), m.load_all_data(), m.load_all_data());

    assert_eq!(host.calls(), 4);
    assert!(m.is_data_loaded());
    assert_eq!(m.data_summary().total_records, 6);
}

#[tokio::test(start_paused = true)]
async fn partial_failure_keeps_other_sources() {
    let mut files = all_files();
    files.retain(|(path, _)| *path != "/data/idsp.csv");
    let m = manager(FakeHost::new(&files, Duration::ZERO));
    m.load_all_data().await;

    assert_eq!(m.data_origin(), Some(DataOrigin::Sources));
    assert!(m.outbreak_data().is_empty());
    assert_eq!(m.vehicle_data().len(), 2);
    assert_eq!(m.data_summary().failed_sources, vec![DatasetKind::Outbreak]);
}

// ── Fallback to sample data ──────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn all_sources_failing_serves_sample_data() {
    let m = manager(FakeHost::new(&[], Duration::ZERO));
    m.load_all_data().await;

    assert!(m.is_data_loaded());
    assert_eq!(m.data_origin(), Some(DataOrigin::Sample));
    assert_eq!(m.vehicle_data().len(), 6);
    assert_eq!(m.outbreak_data().len(), 2);
    assert_eq!(m.population_data().len(), 4);
    assert_eq!(m.air_quality_data().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn timeout_serves_sample_data_and_discards_late_results() {
    let host = FakeHost::new(&all_files(), Duration::from_secs(45));
    let m = manager(host.clone());

    let started = tokio::time::Instant::now();
    m.load_all_data().await;
    assert_eq!(started.elapsed(), Duration::from_secs(30));
    assert_eq!(m.data_origin(), Some(DataOrigin::Sample));
    assert_eq!(m.vehicle_data().len(), 6);

    // The slow fetches were dropped with the load; nothing lands later.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(m.data_origin(), Some(DataOrigin::Sample));
    assert_eq!(m.vehicle_data().len(), 6);
    assert_eq!(m.cache_stats().size, 0);
}

// ── Cancellation ─────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn cancelled_load_rolls_back_to_empty() {
    let host = FakeHost::new(&all_files(), Duration::from_secs(10));
    let m = Arc::new(manager(host.clone()));

    let task = tokio::spawn({
        let m = m.clone();
        async move { m.load_all_data().await }
    });
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(m.phase(), Phase::Loading);

    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());
    assert_eq!(m.phase(), Phase::Empty);

    // The next caller performs a fresh load.
    m.load_all_data().await;
    assert_eq!(m.data_origin(), Some(DataOrigin::Sources));
}

// ── Reload ───────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn reload_picks_up_changed_sources() {
    let host = FakeHost::new(&all_files(), Duration::ZERO);
    let m = manager(host.clone());
    m.load_all_data().await;
    assert_eq!(m.air_quality_data().len(), 1);

    host.put(
        "/data/aqi.csv",
        "state,area,date,aqi_value\nGoa,Panaji,2023-05-01,48\nGoa,Margao,2023-05-01,61\n",
    );
    m.load_all_data().await;
    assert_eq!(m.air_quality_data().len(), 1);

    m.reload().await;
    assert_eq!(m.air_quality_data().len(), 2);
    assert!(m.is_data_loaded());
    assert_eq!(host.calls(), 8);
}

// ── Summary and profile surfaces ─────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn summary_serializes_to_json() {
    let m = manager(FakeHost::new(&all_files(), Duration::ZERO));
    m.load_all_data().await;

    let json = serde_json::to_value(m.data_summary()).unwrap();
    assert_eq!(json["origin"], "sources");
    assert_eq!(json["is_loaded"], true);
    assert_eq!(json["total_records"], 6);
    assert_eq!(json["datasets"][0]["kind"], "vehicle");
    assert_eq!(json["datasets"][0]["rejected"], 1);
    assert_eq!(json["datasets"][3]["kind"], "air_quality");
}

#[tokio::test(start_paused = true)]
async fn column_profile_reflects_loaded_data() {
    let m = manager(FakeHost::new(&all_files(), Duration::ZERO));
    m.load_all_data().await;

    let profile = m.column_profile(DatasetKind::Vehicle);
    let fuel = profile.iter().find(|c| c.name == "fuel").unwrap();
    assert_eq!(fuel.column_type, ColumnType::Categorical);
    assert_eq!(
        fuel.unique_values.as_deref(),
        Some(&["Diesel".to_string(), "Petrol".to_string()][..])
    );

    let aqi = m.column_profile(DatasetKind::AirQuality);
    let date = aqi.iter().find(|c| c.name == "date").unwrap();
    assert_eq!(date.column_type, ColumnType::Date);
    assert!(date.stats.is_none() && date.unique_values.is_none());
}
