//! Engine configuration, loaded from TOML.
//!
//! Every field has a default, so an empty document is a valid configuration:
//!
//! ```toml
//! load_timeout_secs = 30
//!
//! [retry]
//! max_retries = 3
//! base_delay_ms = 1000
//! min_content_len = 10
//!
//! [sources]
//! vehicle = "/data/vahan.csv"
//! outbreak = "/data/idsp.csv"
//! population = "/data/population_projection.csv"
//! air_quality = "/data/aqi.csv"
//! ```

use civicpulse_core::data::RetryPolicy;
use civicpulse_core::DatasetKind;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on one orchestrated load before falling back to sample data.
    pub load_timeout_secs: u64,
    pub retry: RetryConfig,
    pub sources: SourcePaths,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            load_timeout_secs: 30,
            retry: RetryConfig::default(),
            sources: SourcePaths::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub min_content_len: usize,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_retries: policy.max_retries,
            base_delay_ms: policy.base_delay.as_millis() as u64,
            min_content_len: policy.min_content_len,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.base_delay_ms),
            min_content_len: self.min_content_len,
        }
    }
}

/// Resource path per dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcePaths {
    pub vehicle: String,
    pub outbreak: String,
    pub population: String,
    pub air_quality: String,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            vehicle: DatasetKind::Vehicle.default_path().to_string(),
            outbreak: DatasetKind::Outbreak.default_path().to_string(),
            population: DatasetKind::Population.default_path().to_string(),
            air_quality: DatasetKind::AirQuality.default_path().to_string(),
        }
    }
}

impl SourcePaths {
    pub fn path_for(&self, kind: DatasetKind) -> &str {
        match kind {
            DatasetKind::Vehicle => &self.vehicle,
            DatasetKind::Outbreak => &self.outbreak,
            DatasetKind::Population => &self.population,
            DatasetKind::AirQuality => &self.air_quality,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_retries < 1 {
            return Err(ConfigError::Invalid("retry.max_retries must be at least 1".into()));
        }
        if self.load_timeout_secs == 0 {
            return Err(ConfigError::Invalid("load_timeout_secs must be positive".into()));
        }
        for kind in DatasetKind::ALL {
            if self.sources.path_for(kind).trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "sources: empty path for {kind}"
                )));
            }
        }
        Ok(())
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}
