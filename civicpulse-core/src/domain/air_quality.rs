//! Daily air quality index readings.

use super::{DatasetKind, FieldAccess, Record};
use crate::data::ingest::RawRow;
use crate::schema::{ColumnSpec, ColumnType};
use crate::validate::{self, Rejection};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upper bound accepted for an AQI reading.
pub const MAX_AQI: f64 = 1000.0;

/// One AQI reading for an area on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityRecord {
    pub state: String,
    pub area: String,
    pub pollutants: String,
    pub status: String,
    pub date: NaiveDate,
    /// 0..=1000
    pub aqi_value: f64,
    pub monitoring_stations: u64,
}

impl Record for AirQualityRecord {
    const KIND: DatasetKind = DatasetKind::AirQuality;

    const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::new("state", ColumnType::Categorical),
        ColumnSpec::new("area", ColumnType::Categorical),
        ColumnSpec::new("pollutants", ColumnType::Text),
        ColumnSpec::new("status", ColumnType::Categorical),
        ColumnSpec::new("date", ColumnType::Date),
        ColumnSpec::new("aqi_value", ColumnType::Numeric),
        ColumnSpec::new("monitoring_stations", ColumnType::Numeric),
    ];

    fn from_row(row: &RawRow) -> Result<Self, Rejection> {
        let aqi_raw = validate::required(row, "aqi_value")?;
        let date_raw = validate::required(row, "date")?;

        let aqi_value = validate::parse_float("aqi_value", aqi_raw)?;
        let date = validate::parse_date("date", date_raw)?;
        let aqi_value = validate::float_in("aqi_value", aqi_value, 0.0..=MAX_AQI)?;

        Ok(Self {
            state: validate::text(row, "state"),
            area: validate::text(row, "area"),
            pollutants: validate::text(row, "prominent_pollutants"),
            status: validate::text(row, "air_quality_status"),
            date,
            aqi_value,
            monitoring_stations: validate::count(row, "number_of_monitoring_stations")?,
        })
    }
}

impl FieldAccess for AirQualityRecord {
    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "state" => Some(&self.state),
            "area" => Some(&self.area),
            "pollutants" | "prominent_pollutants" => Some(&self.pollutants),
            "status" | "air_quality_status" => Some(&self.status),
            _ => None,
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        match field {
            "aqi_value" => Some(self.aqi_value),
            "monitoring_stations" | "number_of_monitoring_stations" => {
                Some(self.monitoring_stations as f64)
            }
            _ => None,
        }
    }

    fn date(&self, field: &str) -> Option<NaiveDate> {
        (field == "date").then_some(self.date)
    }
}
