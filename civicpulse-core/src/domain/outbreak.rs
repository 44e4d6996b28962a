//! Disease outbreak reports (IDSP).

use super::{DatasetKind, FieldAccess, Record};
use crate::data::ingest::RawRow;
use crate::schema::{ColumnSpec, ColumnType};
use crate::validate::{self, Rejection};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One reported outbreak.
///
/// Invariant: `outbreak_start <= reporting_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutbreakRecord {
    pub state: String,
    pub district: String,
    pub disease_name: String,
    pub status: String,
    pub outbreak_start: NaiveDate,
    pub reporting_date: NaiveDate,
    pub cases: u64,
    pub deaths: u64,
}

impl OutbreakRecord {
    /// Days between outbreak start and the report.
    pub fn reporting_lag_days(&self) -> i64 {
        (self.reporting_date - self.outbreak_start).num_days()
    }
}

impl Record for OutbreakRecord {
    const KIND: DatasetKind = DatasetKind::Outbreak;

    const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::new("state", ColumnType::Categorical),
        ColumnSpec::new("district", ColumnType::Categorical),
        ColumnSpec::new("disease_name", ColumnType::Categorical),
        ColumnSpec::new("status", ColumnType::Categorical),
        ColumnSpec::new("outbreak_start", ColumnType::Date),
        ColumnSpec::new("reporting_date", ColumnType::Date),
        ColumnSpec::new("cases", ColumnType::Numeric),
        ColumnSpec::new("deaths", ColumnType::Numeric),
    ];

    fn from_row(row: &RawRow) -> Result<Self, Rejection> {
        let start_raw = validate::required(row, "outbreak_starting_date")?;
        let reported_raw = validate::required(row, "reporting_date")?;

        let outbreak_start = validate::parse_date("outbreak_starting_date", start_raw)?;
        let reporting_date = validate::parse_date("reporting_date", reported_raw)?;
        if outbreak_start > reporting_date {
            return Err(Rejection::DateOrder {
                start: outbreak_start,
                reported: reporting_date,
            });
        }

        Ok(Self {
            state: validate::text(row, "state"),
            district: validate::text(row, "district"),
            disease_name: validate::text(row, "disease_illness_name"),
            status: validate::text(row, "status"),
            outbreak_start,
            reporting_date,
            cases: validate::count(row, "cases")?,
            deaths: validate::count(row, "deaths")?,
        })
    }
}

impl FieldAccess for OutbreakRecord {
    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "state" => Some(&self.state),
            "district" => Some(&self.district),
            "disease_name" | "disease_illness_name" => Some(&self.disease_name),
            "status" => Some(&self.status),
            _ => None,
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        match field {
            "cases" => Some(self.cases as f64),
            "deaths" => Some(self.deaths as f64),
            _ => None,
        }
    }

    fn date(&self, field: &str) -> Option<NaiveDate> {
        match field {
            "outbreak_start" | "outbreak_starting_date" => Some(self.outbreak_start),
            "reporting_date" => Some(self.reporting_date),
            _ => None,
        }
    }
}
