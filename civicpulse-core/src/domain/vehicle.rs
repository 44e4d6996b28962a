//! Vehicle registration counts (VAHAN).

use super::{DatasetKind, FieldAccess, Record};
use crate::data::ingest::RawRow;
use crate::schema::{ColumnSpec, ColumnType};
use crate::validate::{self, Rejection};
use serde::{Deserialize, Serialize};

/// Registrations of one vehicle class and fuel in one district and month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub state: String,
    pub district: String,
    pub vehicle_class: String,
    pub fuel: String,
    pub year: i32,
    /// 1..=12
    pub month: u32,
    /// Registrations, never negative.
    pub value: f64,
}

impl Record for VehicleRecord {
    const KIND: DatasetKind = DatasetKind::Vehicle;

    const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::new("state", ColumnType::Categorical),
        ColumnSpec::new("district", ColumnType::Categorical),
        ColumnSpec::new("vehicle_class", ColumnType::Categorical),
        ColumnSpec::new("fuel", ColumnType::Categorical),
        ColumnSpec::new("year", ColumnType::Numeric),
        ColumnSpec::new("month", ColumnType::Numeric),
        ColumnSpec::new("value", ColumnType::Numeric),
    ];

    fn from_row(row: &RawRow) -> Result<Self, Rejection> {
        let year = validate::parse_int("year", validate::required(row, "year")?)?;
        let month = validate::parse_int("month", validate::required(row, "month")?)?;
        let value = validate::parse_float("value", validate::required(row, "value")?)?;

        let month = validate::int_in("month", month, 1..=12)?;
        let value = validate::float_in("value", value, 0.0..=f64::MAX)?;

        Ok(Self {
            state: validate::text(row, "state"),
            district: validate::text(row, "district"),
            vehicle_class: validate::text(row, "vehicle_class"),
            fuel: validate::text(row, "fuel"),
            year: validate::to_i32("year", year)?,
            month: month as u32,
            value,
        })
    }
}

impl FieldAccess for VehicleRecord {
    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "state" => Some(&self.state),
            "district" => Some(&self.district),
            "vehicle_class" => Some(&self.vehicle_class),
            "fuel" => Some(&self.fuel),
            _ => None,
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        match field {
            "year" => Some(self.year as f64),
            "month" => Some(self.month as f64),
            "value" => Some(self.value),
            _ => None,
        }
    }
}
