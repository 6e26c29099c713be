use serde::{Deserialize, Serialize};

/// Mean Earth radius (IUGG), km.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;
/// Cruise speed at the equator, km/h.
pub const BASE_SPEED_KMH: f64 = 800.0;
/// Speed reduction reached at the poles.
pub const POLAR_SLOWDOWN: f64 = 0.2;
/// Fixed take-off and landing allowance, hours.
pub const GROUND_OPS_HOURS: f64 = 0.5;

/// Geographic position in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoCoord {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoord {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Haversine distance on a sphere of radius [`EARTH_RADIUS_KM`].
pub fn great_circle_km(a: GeoCoord, b: GeoCoord) -> f64 {
    let (phi1, phi2) = (a.lat.to_radians(), b.lat.to_radians());
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Flight time in hours: cruise speed drops linearly with the mean absolute
/// latitude (up to [`POLAR_SLOWDOWN`] at the poles), plus
/// [`GROUND_OPS_HOURS`].
pub fn estimate_flight_hours(distance_km: f64, lat1: f64, lat2: f64) -> f64 {
    let avg_lat = (lat1.abs() + lat2.abs()) / 2.0;
    let speed = BASE_SPEED_KMH * (1.0 - (avg_lat / 90.0) * POLAR_SLOWDOWN);
    distance_km / speed + GROUND_OPS_HOURS
}

/// Round to 2 decimals.
#[inline]
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn one_degree_on_equator() {
        let d = great_circle_km(GeoCoord::new(0.0, 0.0), GeoCoord::new(0.0, 1.0));
        assert_abs_diff_eq!(d, EARTH_RADIUS_KM * std::f64::consts::PI / 180.0, epsilon = 1e-9);
    }

    #[test]
    fn london_paris() {
        let london = GeoCoord::new(51.5074, -0.1278);
        let paris = GeoCoord::new(48.8566, 2.3522);
        let d = great_circle_km(london, paris);
        assert!((d - 343.5).abs() < 2.0, "got {d}");
        assert_abs_diff_eq!(d, great_circle_km(paris, london), epsilon = 1e-9);
    }

    #[test]
    fn antipodes_are_half_circumference() {
        let d = great_circle_km(GeoCoord::new(0.0, 0.0), GeoCoord::new(0.0, 180.0));
        assert_abs_diff_eq!(d, EARTH_RADIUS_KM * std::f64::consts::PI, epsilon = 1e-6);
    }

    #[test]
    fn flight_time_model() {
        // equator: 800 km/h
        assert_abs_diff_eq!(estimate_flight_hours(1600.0, 0.0, 0.0), 2.5, epsilon = 1e-12);
        // poles: 640 km/h
        assert_abs_diff_eq!(estimate_flight_hours(640.0, 90.0, -90.0), 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(estimate_flight_hours(0.0, 45.0, 10.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn rounding_and_validity() {
        assert_abs_diff_eq!(round2(9712.34567), 9712.35, epsilon = 1e-9);
        assert!(GeoCoord::new(35.0, 139.0).is_valid());
        assert!(!GeoCoord::new(95.0, 0.0).is_valid());
        assert!(!GeoCoord::new(f64::NAN, 0.0).is_valid());
    }
}
