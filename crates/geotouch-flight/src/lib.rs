//! Flight distance and time between named map regions.
//!
//! A [`Geocoder`] turns a region name into a [`GeoCoord`]; the
//! [`FlightInfoService`] caches those positions and the resulting
//! [`FlightInfo`] records for the life of the process. Distances are
//! great-circle (haversine) and flight time uses a latitude-adjusted cruise
//! speed plus a fixed ground allowance.
//!
//! ```
//! use geotouch_flight::{FlightInfoService, Gazetteer, GeoCoord};
//!
//! let gazetteer = Gazetteer::from_entries([
//!     ("Quito", GeoCoord::new(0.0, -78.5)),
//!     ("Libreville", GeoCoord::new(0.0, 9.5)),
//! ])
//! .unwrap();
//! let mut service = FlightInfoService::new(gazetteer);
//! let info = service.lookup("Quito", "Libreville").unwrap();
//! assert!(info.distance_km > 9700.0 && info.distance_km < 9900.0);
//! ```

mod error;
mod geo;
mod geocoder;
mod service;

pub use error::FlightError;
pub use geo::{
    estimate_flight_hours, great_circle_km, round2, GeoCoord, BASE_SPEED_KMH, EARTH_RADIUS_KM,
    GROUND_OPS_HOURS, POLAR_SLOWDOWN,
};
pub use geocoder::{Gazetteer, Geocoder, TimeoutGeocoder};
pub use service::{FlightInfo, FlightInfoService, FlightLookup};
