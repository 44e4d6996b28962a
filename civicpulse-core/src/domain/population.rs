//! Population projections.

use super::{DatasetKind, FieldAccess, Record};
use crate::data::ingest::RawRow;
use crate::schema::{ColumnSpec, ColumnType};
use crate::validate::{self, Rejection};
use serde::{Deserialize, Serialize};

/// Projected head count for one district, gender and year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationRecord {
    pub state: String,
    pub district: String,
    pub gender: String,
    /// 1900..=2100
    pub year: i32,
    pub value: f64,
}

impl Record for PopulationRecord {
    const KIND: DatasetKind = DatasetKind::Population;

    const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::new("state", ColumnType::Categorical),
        ColumnSpec::new("district", ColumnType::Categorical),
        ColumnSpec::new("gender", ColumnType::Categorical),
        ColumnSpec::new("year", ColumnType::Numeric),
        ColumnSpec::new("value", ColumnType::Numeric),
    ];

    fn from_row(row: &RawRow) -> Result<Self, Rejection> {
        let year = validate::parse_int("year", validate::required(row, "year")?)?;
        let value = validate::parse_float("value", validate::required(row, "value")?)?;

        let value = validate::float_in("value", value, 0.0..=f64::MAX)?;
        let year = validate::int_in("year", year, 1900..=2100)?;

        Ok(Self {
            state: validate::text(row, "state"),
            district: validate::text(row, "district"),
            gender: validate::text(row, "gender"),
            year: year as i32,
            value,
        })
    }
}

impl FieldAccess for PopulationRecord {
    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "state" => Some(&self.state),
            "district" => Some(&self.district),
            "gender" => Some(&self.gender),
            _ => None,
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        match field {
            "year" => Some(self.year as f64),
            "value" => Some(self.value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: &str, value: &str) -> RawRow {
        RawRow::from_pairs([
            ("State", "Delhi"),
            ("District", "New Delhi"),
            ("Gender", "Female"),
            ("Year", year),
            ("Value", value),
        ])
    }

    #[test]
    fn valid_row_becomes_record() {
        let rec = PopulationRecord::from_row(&row("2023", "8100000")).unwrap();
        assert_eq!(rec.state, "Delhi");
        assert_eq!(rec.gender, "Female");
        assert_eq!(rec.year, 2023);
        assert_eq!(rec.value, 8_100_000.0);
    }

    #[test]
    fn year_bounds_are_inclusive() {
        assert!(PopulationRecord::from_row(&row("1900", "1")).is_ok());
        assert!(PopulationRecord::from_row(&row("2100", "1")).is_ok());
        assert!(matches!(
            PopulationRecord::from_row(&row("1899", "1")),
            Err(Rejection::OutOfRange { field: "year", .. })
        ));
        assert!(matches!(
            PopulationRecord::from_row(&row("2101", "1")),
            Err(Rejection::OutOfRange { field: "year", .. })
        ));
    }

    #[test]
    fn negative_value_rejects() {
        assert!(matches!(
            PopulationRecord::from_row(&row("2023", "-10")),
            Err(Rejection::OutOfRange { field: "value", .. })
        ));
    }

    #[test]
    fn missing_value_rejects() {
        assert_eq!(
            PopulationRecord::from_row(&row("2023", "")),
            Err(Rejection::MissingField { field: "value" })
        );
    }
}
