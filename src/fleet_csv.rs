//! CSV-backed fleet source.
//!
//! Vehicles are read from a headed table (Spanish or English column names);
//! orders from a headerless `address,created_at,customer,status` table.
//! Both files are re-read on every call.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::model::{Order, Vehicle};
use crate::traits::FleetSource;

#[derive(Debug, Clone)]
pub struct CsvFleetSource {
    pub vehicles_path: PathBuf,
    pub orders_path: PathBuf,
}

impl CsvFleetSource {
    pub fn new(vehicles_path: impl Into<PathBuf>, orders_path: impl Into<PathBuf>) -> Self {
        Self {
            vehicles_path: vehicles_path.into(),
            orders_path: orders_path.into(),
        }
    }
}

impl FleetSource for CsvFleetSource {
    fn vehicles(&self) -> Result<Vec<Vehicle>, StoreError> {
        read_table(&self.vehicles_path, true)
    }

    fn orders(&self) -> Result<Vec<Order>, StoreError> {
        read_table(&self.orders_path, false)
    }
}

fn read_table<T: DeserializeOwned>(path: &Path, has_headers: bool) -> Result<Vec<T>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .trim(csv::Trim::All)
        .from_reader(File::open(path)?);

    let rows = reader.deserialize::<T>().collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
