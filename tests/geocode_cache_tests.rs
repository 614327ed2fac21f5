//! Geocode cache tests against the CSV store
//!
//! Idempotence, persistence across cache instances, and serialized
//! write-through under concurrent lookups.

mod fixtures;

use std::fs;

use fixtures::*;
use fleet_assign::cache::{CsvGeocodeStore, GeocodeCache};
use fleet_assign::fleet_csv::CsvFleetSource;
use fleet_assign::model::Coordinate;
use fleet_assign::planner::{PlanOptions, plan_from_source};
use fleet_assign::traits::GeocodeStore;

fn csv_cache(dir: &tempfile::TempDir) -> GeocodeCache<StubGeocoder, CsvGeocodeStore> {
    GeocodeCache::new(
        StubGeocoder::medellin(),
        CsvGeocodeStore::new(dir.path().join("geocode_pedidos.csv")),
    )
}

#[test]
fn same_address_twice_appends_once() {
    let dir = tempfile::tempdir().unwrap();
    let cache = csv_cache(&dir);

    let first = cache.resolve(NORTH_DROP.address, DEPOT.address).unwrap();
    let second = cache.resolve(NORTH_DROP.address, DEPOT.address).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, Coordinate::new(NORTH_DROP.lat, NORTH_DROP.lng));
    assert_eq!(cache.store().load().unwrap().len(), 1);
}

#[test]
fn empty_store_is_total_miss() {
    let dir = tempfile::tempdir().unwrap();
    let cache = csv_cache(&dir);
    assert!(cache.store().load().unwrap().is_empty());

    let addresses: Vec<&str> = DELIVERIES.iter().map(|location| location.address).collect();
    cache.resolve_many(&addresses, DEPOT.address).unwrap();

    assert_eq!(cache.store().load().unwrap().len(), DELIVERIES.len());
}

#[test]
fn records_survive_new_cache_instance() {
    let dir = tempfile::tempdir().unwrap();
    let addresses: Vec<&str> = DELIVERIES.iter().map(|location| location.address).collect();

    let warm = csv_cache(&dir).resolve_many_strict(&addresses).unwrap();

    let cache = csv_cache(&dir);
    let cached = cache.resolve_many_strict(&addresses).unwrap();

    assert_eq!(warm, cached);
    assert_eq!(cache.store().load().unwrap().len(), DELIVERIES.len());

    let contents = fs::read_to_string(dir.path().join("geocode_pedidos.csv")).unwrap();
    assert!(contents.starts_with("query,address,lat,lon\n"));
    assert_eq!(contents.lines().count(), DELIVERIES.len() + 1);
}

#[test]
fn concurrent_misses_do_not_duplicate_records() {
    let dir = tempfile::tempdir().unwrap();
    let cache = csv_cache(&dir).with_parallel(true);
    let addresses: Vec<&str> = DELIVERIES
        .iter()
        .chain(DELIVERIES.iter())
        .map(|location| location.address)
        .collect();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| cache.resolve_many_strict(&addresses).unwrap());
        }
    });

    let records = cache.store().load().unwrap();
    assert_eq!(records.len(), DELIVERIES.len());
}

#[test]
fn unreadable_store_still_resolves() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geocode_pedidos.csv");
    fs::write(&path, "query,address,lat,lon\nbroken,row,not-a-number,0\n").unwrap();

    let cache = GeocodeCache::new(StubGeocoder::medellin(), CsvGeocodeStore::new(&path));
    let coordinate = cache.resolve_strict(SOUTH_DROP.address).unwrap();

    assert_eq!(coordinate, Coordinate::new(SOUTH_DROP.lat, SOUTH_DROP.lng));
}

#[test]
fn plan_from_csv_source_reuses_geocodes() {
    let dir = tempfile::tempdir().unwrap();
    let vehicles_path = dir.path().join("vehiculos.csv");
    let orders_path = dir.path().join("pedidos.csv");
    fs::write(
        &vehicles_path,
        "placa,tipo,modelo,anio,capacidad,kilometraje,combustible,rendimiento\n\
         ABC123,furgon,NPR,2018,20,120000,gasolina,40\n\
         XYZ789,camioneta,Hilux,2021,18,45000,acpm,35\n",
    )
    .unwrap();
    fs::write(
        &orders_path,
        format!(
            "\"{}\",2024-05-01 10:00,Ana Gómez,Pendiente\n\
             \"{}\",2024-05-01 11:30,Luis Pérez,Pendiente\n",
            NORTH_DROP.address, SOUTH_DROP.address
        ),
    )
    .unwrap();

    let source = CsvFleetSource::new(&vehicles_path, &orders_path);
    let cache = csv_cache(&dir);

    let first = plan_from_source(DEPOT.address, &source, &cache, &PlanOptions::default()).unwrap();
    let calls_after_first = cache_calls(&cache);
    let second = plan_from_source(DEPOT.address, &source, &cache, &PlanOptions::default()).unwrap();

    assert_eq!(first.plan.assignment, second.plan.assignment);
    assert_eq!(cache_calls(&cache), calls_after_first, "second plan should be served from cache");
    assert_eq!(cache.store().load().unwrap().len(), 3);

    let details = second.details();
    assert_eq!(details[0].plate, "ABC123");
    assert_eq!(details[0].customer, "Ana Gómez");
    assert_eq!(details[1].plate, "XYZ789");
}

fn cache_calls(cache: &GeocodeCache<StubGeocoder, CsvGeocodeStore>) -> usize {
    cache.geocoder().calls()
}
