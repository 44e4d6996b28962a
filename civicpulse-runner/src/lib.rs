//! CivicPulse Runner: load orchestration and the data manager lifecycle.
//!
//! This crate builds on `civicpulse-core` to provide:
//! - Engine configuration from TOML
//! - Concurrent loading of the four sources with per-source degradation
//! - The data manager state machine with load deduplication and timeout
//! - Built-in sample data for offline and failure fallback

pub mod config;
pub mod data_loader;
pub mod manager;
pub mod sample_data;

pub use config::{ConfigError, EngineConfig, RetryConfig, SourcePaths};
pub use data_loader::{LoadedData, Loader, SourceError};
pub use manager::{DataManager, DataOrigin, DataSummary, DatasetSummary, LoadingStatus, Phase};
pub use sample_data::sample_data;
