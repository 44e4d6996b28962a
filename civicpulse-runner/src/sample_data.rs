//! Built-in sample datasets, served when the real sources are unavailable.
//!
//! The samples are CSV text run through the same transformers as live data,
//! so they obey every record invariant.

use crate::data_loader::LoadedData;
use civicpulse_core::data::parse_dataset;
use civicpulse_core::{
    AirQualityRecord, DatasetKind, OutbreakRecord, PopulationRecord, Record, VehicleRecord,
};
use std::sync::Arc;

const VEHICLE_CSV: &str = "\
state,district,vehicle_class,fuel,year,month,value
Maharashtra,Mumbai,Car,Petrol,2023,1,15000
Maharashtra,Mumbai,Motorcycle,Petrol,2023,1,25000
Maharashtra,Pune,Car,Diesel,2023,1,8000
Delhi,New Delhi,Car,CNG,2023,1,12000
Karnataka,Bangalore,Bus,Diesel,2023,2,800
Tamil Nadu,Chennai,Truck,Diesel,2023,2,1200
";

const OUTBREAK_CSV: &str = "\
state,district,disease_illness_name,outbreak_starting_date,reporting_date,cases,deaths,status
Maharashtra,Mumbai,Dengue,2023-01-15,2023-01-20,150,2,Active
Delhi,New Delhi,Malaria,2023-02-01,2023-02-05,89,1,Controlled
";

const POPULATION_CSV: &str = "\
state,district,gender,year,value
Maharashtra,Mumbai,Male,2023,6200000
Maharashtra,Mumbai,Female,2023,5800000
Delhi,New Delhi,Male,2023,8900000
Delhi,New Delhi,Female,2023,8100000
";

const AIR_QUALITY_CSV: &str = "\
state,area,date,aqi_value,air_quality_status,prominent_pollutants,number_of_monitoring_stations
Maharashtra,Mumbai Central,2023-01-15,156,Moderate,\"PM2.5, NO2\",5
Delhi,Connaught Place,2023-01-15,289,Poor,\"PM2.5, PM10\",8
";

fn sample_csv(kind: DatasetKind) -> &'static str {
    match kind {
        DatasetKind::Vehicle => VEHICLE_CSV,
        DatasetKind::Outbreak => OUTBREAK_CSV,
        DatasetKind::Population => POPULATION_CSV,
        DatasetKind::AirQuality => AIR_QUALITY_CSV,
    }
}

fn sample<R: Record>() -> Arc<civicpulse_core::Dataset<R>> {
    Arc::new(parse_dataset(R::KIND.source_key(), sample_csv(R::KIND)))
}

/// All four sample datasets, with no recorded failures.
pub fn sample_data() -> LoadedData {
    LoadedData {
        vehicle: sample::<VehicleRecord>(),
        outbreak: sample::<OutbreakRecord>(),
        population: sample::<PopulationRecord>(),
        air_quality: sample::<AirQualityRecord>(),
        failures: Vec::new(),
    }
}
