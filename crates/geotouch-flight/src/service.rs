use crate::geo::{estimate_flight_hours, great_circle_km, round2};
use crate::{GeoCoord, Geocoder};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Distance and estimated flight time between two named regions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightInfo {
    pub from: String,
    pub to: String,
    pub distance_km: f64,
    pub flight_time_hours: f64,
}

impl FlightInfo {
    /// Build a record from two resolved positions; values are rounded to 2
    /// decimals.
    pub fn between(from: &str, a: GeoCoord, to: &str, b: GeoCoord) -> Self {
        let distance = great_circle_km(a, b);
        Self {
            from: from.to_string(),
            to: to.to_string(),
            distance_km: round2(distance),
            flight_time_hours: round2(estimate_flight_hours(distance, a.lat, b.lat)),
        }
    }
}

/// Anything that can answer "how far from A to B".
pub trait FlightLookup {
    fn flight_info(&mut self, from: &str, to: &str) -> Option<FlightInfo>;
}

/// Cache-or-fetch front of a [`Geocoder`].
///
/// Resolved coordinates are cached per name and finished records per
/// ordered name pair, for the lifetime of the service. A failed lookup is
/// not cached: the name is asked for again on the next call, unless a
/// [`retry window`](FlightInfoService::with_retry_after) is set, in which
/// case it is skipped until the window has passed.
#[derive(Debug)]
pub struct FlightInfoService<G> {
    geocoder: G,
    coords: HashMap<String, GeoCoord>,
    records: HashMap<(String, String), FlightInfo>,
    failed: HashMap<String, Instant>,
    retry_after: Duration,
}

impl<G: Geocoder> FlightInfoService<G> {
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder,
            coords: HashMap::new(),
            records: HashMap::new(),
            failed: HashMap::new(),
            retry_after: Duration::ZERO,
        }
    }

    /// Do not ask the geocoder again for a name that failed less than
    /// `window` ago.
    pub fn with_retry_after(mut self, window: Duration) -> Self {
        self.retry_after = window;
        self
    }

    pub fn retry_after(&self) -> Duration {
        self.retry_after
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Cached record for the pair, if it was resolved before.
    pub fn cached(&self, from: &str, to: &str) -> Option<&FlightInfo> {
        self.records.get(&(from.to_string(), to.to_string()))
    }

    pub fn cached_pairs(&self) -> usize {
        self.records.len()
    }

    fn coordinate(&mut self, name: &str) -> Option<GeoCoord> {
        if let Some(hit) = self.coords.get(name) {
            return Some(*hit);
        }
        if let Some(at) = self.failed.get(name) {
            if at.elapsed() < self.retry_after {
                return None;
            }
        }

        match self.geocoder.locate(name) {
            Some(found) => {
                self.failed.remove(name);
                self.coords.insert(name.to_string(), found);
                Some(found)
            }
            None => {
                info!("no location for region {name:?}");
                self.failed.insert(name.to_string(), Instant::now());
                None
            }
        }
    }

    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn lookup(&mut self, from: &str, to: &str) -> Option<FlightInfo> {
        let key = (from.to_string(), to.to_string());
        if let Some(hit) = self.records.get(&key) {
            return Some(hit.clone());
        }

        let (a, b) = (self.coordinate(from), self.coordinate(to));
        let record = FlightInfo::between(from, a?, to, b?);
        debug!(
            "{from} -> {to}: {:.2} km, {:.2} h",
            record.distance_km, record.flight_time_hours
        );
        self.records.insert(key, record.clone());
        Some(record)
    }
}

impl<G: Geocoder> FlightLookup for FlightInfoService<G> {
    fn flight_info(&mut self, from: &str, to: &str) -> Option<FlightInfo> {
        self.lookup(from, to)
    }
}
