//! Write-through geocode cache.
//!
//! Every lookup first consults the record store by query text. On a miss the
//! provider is called and the result is matched against stored records by
//! resolved address before anything is appended, so two spellings of the same
//! place share one record. Appends are serialized behind a write lock and
//! store reads wait for any append in progress.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{GeocodeError, PlannerError, StoreError};
use crate::geocode::geocode_with_fallback;
use crate::model::{Coordinate, GeocodedPoint};
use crate::traits::{GeocodeStore, Geocoder};

pub struct GeocodeCache<G, S> {
    geocoder: G,
    store: S,
    store_lock: RwLock<()>,
    parallel: bool,
}

impl<G: Geocoder, S: GeocodeStore> GeocodeCache<G, S> {
    pub fn new(geocoder: G, store: S) -> Self {
        Self {
            geocoder,
            store,
            store_lock: RwLock::new(()),
            parallel: false,
        }
    }

    /// Issue provider calls for `resolve_many` concurrently.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Resolve one address, retrying once with `fallback`.
    pub fn resolve(&self, address: &str, fallback: &str) -> Result<Coordinate, PlannerError> {
        geocode_with_fallback(self, address, Some(fallback)).map(|point| point.coordinate())
    }

    /// Resolve one address with no fallback.
    pub fn resolve_strict(&self, address: &str) -> Result<Coordinate, PlannerError> {
        geocode_with_fallback(self, address, None).map(|point| point.coordinate())
    }

    /// Coordinates for every address, in input order.
    pub fn resolve_many<A>(
        &self,
        addresses: &[A],
        fallback: &str,
    ) -> Result<Vec<Coordinate>, PlannerError>
    where
        A: AsRef<str> + Sync,
    {
        self.resolve_all(addresses, Some(fallback))
    }

    /// Like [`resolve_many`](Self::resolve_many), but an unresolved address
    /// fails with its position in `addresses`.
    pub fn resolve_many_strict<A>(&self, addresses: &[A]) -> Result<Vec<Coordinate>, PlannerError>
    where
        A: AsRef<str> + Sync,
    {
        self.resolve_all(addresses, None)
    }

    fn resolve_all<A>(
        &self,
        addresses: &[A],
        fallback: Option<&str>,
    ) -> Result<Vec<Coordinate>, PlannerError>
    where
        A: AsRef<str> + Sync,
    {
        let resolve = |(index, address): (usize, &A)| {
            geocode_with_fallback(self, address.as_ref(), fallback)
                .map(|point| point.coordinate())
                .map_err(|err| with_order(err, index))
        };

        if self.parallel {
            addresses.par_iter().enumerate().map(resolve).collect()
        } else {
            addresses.iter().enumerate().map(resolve).collect()
        }
    }

    fn records(&self) -> Vec<GeocodedPoint> {
        match self.store.load() {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "geocode store unreadable, treating cache as empty");
                Vec::new()
            }
        }
    }

    fn write_through(&self, point: GeocodedPoint) -> GeocodedPoint {
        let _guard = self.store_lock.write();

        let records = self.records();

        // Another caller may have appended the same query while we were geocoding.
        if let Some(existing) = records.iter().find(|record| record.query == point.query) {
            return existing.clone();
        }

        // Known place under a new spelling: keep the stored coordinates and
        // record the spelling so it hits by query next time.
        let point = match records.into_iter().find(|record| record.address == point.address) {
            Some(existing) => {
                debug!(
                    query = %point.query,
                    resolved = %existing.address,
                    "geocode cache hit on resolved address"
                );
                GeocodedPoint {
                    query: point.query,
                    ..existing
                }
            }
            None => {
                debug!(query = %point.query, resolved = %point.address, "geocode cache miss");
                point
            }
        };

        self.append_record(&point);
        point
    }

    fn append_record(&self, point: &GeocodedPoint) {
        if let Err(err) = self.store.append(point) {
            warn!(error = %err, query = %point.query, "geocode store append failed");
        }
    }
}

/// One provider attempt routed through the cache.
impl<G: Geocoder, S: GeocodeStore> Geocoder for GeocodeCache<G, S> {
    fn geocode(&self, address: &str) -> Result<GeocodedPoint, GeocodeError> {
        let hit = {
            let _guard = self.store_lock.read();
            self.records().into_iter().find(|record| record.query == address)
        };
        if let Some(hit) = hit {
            debug!(%address, "geocode cache hit");
            return Ok(hit);
        }

        let point = self.geocoder.geocode(address)?;
        Ok(self.write_through(point))
    }
}

fn with_order(err: PlannerError, index: usize) -> PlannerError {
    match err {
        PlannerError::GeocodingFailure { address, source, .. } => PlannerError::GeocodingFailure {
            address,
            order: Some(index),
            source,
        },
        other => other,
    }
}

// ============================================================================
// Stores
// ============================================================================

/// In-process store. Contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryGeocodeStore {
    records: Mutex<Vec<GeocodedPoint>>,
}

impl MemoryGeocodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<GeocodedPoint>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GeocodeStore for MemoryGeocodeStore {
    fn load(&self) -> Result<Vec<GeocodedPoint>, StoreError> {
        Ok(self.records.lock().clone())
    }

    fn append(&self, point: &GeocodedPoint) -> Result<(), StoreError> {
        self.records.lock().push(point.clone());
        Ok(())
    }
}

/// Append-only CSV file with a `query,address,lat,lon` header.
///
/// A missing file reads as an empty store and is created on first append.
#[derive(Debug, Clone)]
pub struct CsvGeocodeStore {
    path: PathBuf,
}

impl CsvGeocodeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GeocodeStore for CsvGeocodeStore {
    fn load(&self) -> Result<Vec<GeocodedPoint>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_reader(File::open(&self.path)?);
        let records = reader
            .deserialize::<GeocodedPoint>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn append(&self, point: &GeocodedPoint) -> Result<(), StoreError> {
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(point)?;
        writer.flush()?;
        Ok(())
    }
}
