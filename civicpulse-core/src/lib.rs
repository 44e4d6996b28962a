//! CivicPulse Core: record types, validation, ingest, fetching, statistics.
//!
//! This crate contains everything below the load orchestrator:
//! - Four record kinds (vehicle registrations, outbreaks, population, air quality)
//! - Field validation and per-kind transformers from raw CSV rows
//! - Transports and the retrying source fetcher
//! - The parse cache
//! - Column profiling and the statistics toolkit

pub mod data;
pub mod domain;
pub mod schema;
pub mod stats;
pub mod validate;

pub use domain::{
    AirQualityRecord, Dataset, DatasetKind, FieldAccess, OutbreakRecord, PopulationRecord, Record,
    VehicleRecord,
};
pub use validate::Rejection;
