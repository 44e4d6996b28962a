//! Criterion benchmarks for CivicPulse hot paths.
//!
//! Benchmarks:
//! 1. CSV ingest + transform (vehicle and outbreak rows)
//! 2. Parse cache hit path
//! 3. Statistics toolkit (describe, correlation, anomalies)
//! 4. Column profile over a loaded dataset

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use civicpulse_core::data::{parse_dataset, ParseCache};
use civicpulse_core::schema::column_profile;
use civicpulse_core::stats;
use civicpulse_core::{Dataset, OutbreakRecord, VehicleRecord};

// ── Helpers ──────────────────────────────────────────────────────────

const STATES: [&str; 5] = ["Maharashtra", "Delhi", "Karnataka", "Tamil Nadu", "Kerala"];
const FUELS: [&str; 4] = ["Petrol", "Diesel", "CNG", "Electric"];

fn make_vahan_csv(rows: usize) -> String {
    let mut out = String::from("State,District,Vehicle Class,Fuel,Year,Month,Value\n");
    for i in 0..rows {
        out.push_str(&format!(
            "{},District {},Car,{},{},{},{}\n",
            STATES[i % STATES.len()],
            i % 40,
            FUELS[i % FUELS.len()],
            2015 + (i % 9),
            1 + (i % 12),
            1000 + (i * 37) % 25_000,
        ));
    }
    out
}

fn make_idsp_csv(rows: usize) -> String {
    let mut out = String::from(
        "State,District,Disease Illness Name,Outbreak Starting Date,Reporting Date,Cases,Deaths,Status\n",
    );
    for i in 0..rows {
        let day = 1 + (i % 20);
        out.push_str(&format!(
            "{},District {},Dengue,2023-01-{:02},2023-01-{:02},{},{},Active\n",
            STATES[i % STATES.len()],
            i % 40,
            day,
            day + 5,
            i % 300,
            i % 7,
        ));
    }
    out
}

fn make_values(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + (i as f64 * 0.1).sin() * 50.0).collect()
}

// ── 1. Ingest + Transform ────────────────────────────────────────────

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");

    for &rows in &[1_000, 10_000, 50_000] {
        let vahan = make_vahan_csv(rows);
        group.bench_with_input(BenchmarkId::new("vehicle", rows), &vahan, |b, text| {
            b.iter(|| parse_dataset::<VehicleRecord>("vahan", black_box(text)));
        });

        let idsp = make_idsp_csv(rows);
        group.bench_with_input(BenchmarkId::new("outbreak", rows), &idsp, |b, text| {
            b.iter(|| parse_dataset::<OutbreakRecord>("idsp", black_box(text)));
        });
    }

    group.finish();
}

// ── 2. Parse Cache ───────────────────────────────────────────────────

fn bench_cache_hit(c: &mut Criterion) {
    let text = make_vahan_csv(10_000);
    let cache = ParseCache::new();
    cache.get_or_parse::<VehicleRecord>("vahan", &text);

    c.bench_function("parse_cache_hit", |b| {
        b.iter(|| cache.get_or_parse::<VehicleRecord>(black_box("vahan"), &text));
    });
}

// ── 3. Statistics ────────────────────────────────────────────────────

fn bench_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats");

    for &n in &[1_000, 100_000] {
        let x = make_values(n);
        let y: Vec<f64> = x.iter().map(|v| v * 0.5 + 3.0).collect();

        group.bench_with_input(BenchmarkId::new("describe", n), &x, |b, x| {
            b.iter(|| stats::describe(black_box(x)));
        });
        group.bench_with_input(BenchmarkId::new("correlation", n), &(x.clone(), y), |b, (x, y)| {
            b.iter(|| stats::correlation(black_box(x), black_box(y)));
        });
        group.bench_with_input(BenchmarkId::new("anomalies", n), &x, |b, x| {
            b.iter(|| stats::anomalies(black_box(x), stats::DEFAULT_ANOMALY_THRESHOLD));
        });
    }

    group.finish();
}

// ── 4. Column Profile ────────────────────────────────────────────────

fn bench_column_profile(c: &mut Criterion) {
    let ds: Dataset<VehicleRecord> = parse_dataset("vahan", &make_vahan_csv(10_000));
    c.bench_function("column_profile_vehicle_10k", |b| {
        b.iter(|| column_profile(black_box(ds.records())));
    });
}

criterion_group!(
    benches,
    bench_ingest,
    bench_cache_hit,
    bench_stats,
    bench_column_profile,
);
criterion_main!(benches);
