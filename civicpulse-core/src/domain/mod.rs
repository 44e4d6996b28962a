//! Domain types for CivicPulse: the four record kinds and the dataset that holds them.

pub mod air_quality;
pub mod dataset;
pub mod outbreak;
pub mod population;
pub mod vehicle;

pub use air_quality::AirQualityRecord;
pub use dataset::{Dataset, DatasetHash};
pub use outbreak::OutbreakRecord;
pub use population::PopulationRecord;
pub use vehicle::VehicleRecord;

use crate::data::ingest::RawRow;
use crate::schema::ColumnSpec;
use crate::validate::Rejection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four tabular sources the engine knows how to ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Vehicle,
    Outbreak,
    Population,
    AirQuality,
}

impl DatasetKind {
    /// Every kind, in load order.
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Vehicle,
        DatasetKind::Outbreak,
        DatasetKind::Population,
        DatasetKind::AirQuality,
    ];

    /// Stable key used by the parse cache and in log fields.
    pub fn source_key(self) -> &'static str {
        match self {
            DatasetKind::Vehicle => "vahan",
            DatasetKind::Outbreak => "idsp",
            DatasetKind::Population => "population",
            DatasetKind::AirQuality => "aqi",
        }
    }

    /// Logical path of the resource on the file host.
    pub fn default_path(self) -> &'static str {
        match self {
            DatasetKind::Vehicle => "/data/vahan.csv",
            DatasetKind::Outbreak => "/data/idsp.csv",
            DatasetKind::Population => "/data/population_projection.csv",
            DatasetKind::AirQuality => "/data/aqi.csv",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetKind::Vehicle => "vehicle registrations",
            DatasetKind::Outbreak => "disease outbreaks",
            DatasetKind::Population => "population projections",
            DatasetKind::AirQuality => "air quality",
        };
        f.write_str(name)
    }
}

/// Read access to a record's fields by column name.
///
/// The presentation layer addresses columns by name, so the statistics toolkit
/// and column profiling go through this trait rather than concrete fields.
pub trait FieldAccess {
    /// Value of a string column, or `None` if `field` is not a string column.
    fn text(&self, field: &str) -> Option<&str>;

    /// Value of a numeric column, or `None` if `field` is not numeric.
    fn number(&self, field: &str) -> Option<f64>;

    /// Value of a date column, or `None` if `field` is not a date.
    fn date(&self, _field: &str) -> Option<NaiveDate> {
        None
    }
}

/// A validated record produced from one generic row.
///
/// `from_row` is the record's transformer: it either yields a record with every
/// field invariant satisfied, or a [`Rejection`] naming the first violation.
pub trait Record: FieldAccess + Clone + Send + Sync + 'static {
    /// Which source this record kind is read from.
    const KIND: DatasetKind;

    /// Column layout, used for profiling.
    const COLUMNS: &'static [ColumnSpec];

    fn from_row(row: &RawRow) -> Result<Self, Rejection>;
}
