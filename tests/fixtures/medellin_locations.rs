//! Aburrá Valley addresses with fixed coordinates.
//!
//! Coordinates are approximate street-level positions taken from
//! OpenStreetMap. They back the stub geocoder so tests never hit the network.

/// A free-text address and where it resolves.
#[derive(Debug, Clone)]
pub struct Location {
    pub address: &'static str,
    pub resolved: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(address: &'static str, resolved: &'static str, lat: f64, lng: f64) -> Self {
        Self {
            address,
            resolved,
            lat,
            lng,
        }
    }
}

// ============================================================================
// Depots
// ============================================================================

pub const DEPOT: Location = Location::new(
    "Calle 76a Sur #55-29, Antioquia, Colombia",
    "Calle 76A Sur, La Estrella, Antioquia, Colombia",
    6.2,
    -75.6,
);

// ============================================================================
// Delivery Addresses
// ============================================================================

pub const NORTH_DROP: Location = Location::new(
    "Carrera 70 #45-20, Medellín",
    "Carrera 70, Laureles, Medellín, Antioquia, Colombia",
    6.25,
    -75.6,
);

pub const SOUTH_DROP: Location = Location::new(
    "Calle 50 Sur #40-10, Sabaneta",
    "Calle 50 Sur, Sabaneta, Antioquia, Colombia",
    6.10,
    -75.55,
);

pub const DELIVERIES: &[Location] = &[
    NORTH_DROP,
    SOUTH_DROP,
    Location::new(
        "Calle 10 #43-12, El Poblado",
        "Calle 10, El Poblado, Medellín, Antioquia, Colombia",
        6.2089,
        -75.5677,
    ),
    Location::new(
        "Carrera 52 #14-30, Guayabal",
        "Carrera 52, Guayabal, Medellín, Antioquia, Colombia",
        6.2167,
        -75.5853,
    ),
    Location::new(
        "Calle 33 #65-11, Belén",
        "Calle 33, Belén, Medellín, Antioquia, Colombia",
        6.2329,
        -75.5946,
    ),
    Location::new(
        "Diagonal 55 #37-41, Bello",
        "Diagonal 55, Bello, Antioquia, Colombia",
        6.3373,
        -75.5579,
    ),
    Location::new(
        "Carrera 48 #20-34, Envigado",
        "Carrera 48, Envigado, Antioquia, Colombia",
        6.1719,
        -75.5913,
    ),
];

/// Every address the stub geocoder knows about.
pub fn all_locations() -> Vec<Location> {
    let mut all = vec![DEPOT];
    all.extend_from_slice(DELIVERIES);
    all
}
