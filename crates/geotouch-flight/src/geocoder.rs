//! Name to coordinate resolution.

use crate::{FlightError, GeoCoord};
use log::{debug, warn};
use std::{
    collections::HashMap,
    fs,
    path::Path,
    sync::{mpsc, Arc},
    thread,
    time::Duration,
};

/// Resolves a region name to a geographic position. `None` means the name is
/// unknown or the lookup failed.
pub trait Geocoder {
    fn locate(&self, name: &str) -> Option<GeoCoord>;
}

impl<G: Geocoder + ?Sized> Geocoder for Arc<G> {
    fn locate(&self, name: &str) -> Option<GeoCoord> {
        (**self).locate(name)
    }
}

impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    fn locate(&self, name: &str) -> Option<GeoCoord> {
        (**self).locate(name)
    }
}

/// Offline name table. Keys are matched case-insensitively after trimming.
///
/// On disk it is a JSON object:
///
/// ```json
/// { "France": { "lat": 46.6, "lon": 2.2 }, "Japan": { "lat": 36.2, "lon": 138.3 } }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Gazetteer {
    entries: HashMap<String, GeoCoord>,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Gazetteer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, coord: GeoCoord) -> Result<(), FlightError> {
        if !coord.is_valid() {
            return Err(FlightError::InvalidCoordinate {
                name: name.to_string(),
                lat: coord.lat,
                lon: coord.lon,
            });
        }
        self.entries.insert(normalize(name), coord);
        Ok(())
    }

    pub fn from_entries<'a, I>(entries: I) -> Result<Self, FlightError>
    where
        I: IntoIterator<Item = (&'a str, GeoCoord)>,
    {
        let mut out = Self::new();
        for (name, coord) in entries {
            out.insert(name, coord)?;
        }
        Ok(out)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, FlightError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let table: HashMap<String, GeoCoord> = serde_json::from_str(&raw)?;
        let out = Self::from_entries(table.iter().map(|(k, v)| (k.as_str(), *v)))?;
        debug!("gazetteer {}: {} entries", path.display(), out.len());
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Geocoder for Gazetteer {
    fn locate(&self, name: &str) -> Option<GeoCoord> {
        self.entries.get(&normalize(name)).copied()
    }
}

/// Bounds another geocoder with a wall-clock timeout.
///
/// Each lookup runs on a short-lived worker thread; if it does not answer
/// within `timeout` the result is `None` and the worker is left to finish on
/// its own.
pub struct TimeoutGeocoder<G> {
    inner: Arc<G>,
    timeout: Duration,
}

impl<G> TimeoutGeocoder<G>
where
    G: Geocoder + Send + Sync + 'static,
{
    pub fn new(inner: G, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<G> Geocoder for TimeoutGeocoder<G>
where
    G: Geocoder + Send + Sync + 'static,
{
    fn locate(&self, name: &str) -> Option<GeoCoord> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let owned = name.to_string();

        let spawned = thread::Builder::new()
            .name("geocode".into())
            .spawn(move || {
                // receiver may be gone after a timeout
                let _ = tx.send(inner.locate(&owned));
            });
        if let Err(err) = spawned {
            warn!("cannot spawn geocoder worker: {err}");
            return None;
        }

        match rx.recv_timeout(self.timeout) {
            Ok(found) => found,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!("geocoding {name:?} timed out after {:?}", self.timeout);
                None
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                warn!("geocoder worker for {name:?} exited without an answer");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Instant;

    struct Slow(Duration);

    impl Geocoder for Slow {
        fn locate(&self, _: &str) -> Option<GeoCoord> {
            thread::sleep(self.0);
            Some(GeoCoord::new(1.0, 2.0))
        }
    }

    #[test]
    fn gazetteer_is_case_insensitive() {
        let g = Gazetteer::from_entries([("France", GeoCoord::new(46.6, 2.2))]).unwrap();
        assert_eq!(g.locate(" france "), Some(GeoCoord::new(46.6, 2.2)));
        assert_eq!(g.locate("FRANCE"), Some(GeoCoord::new(46.6, 2.2)));
        assert_eq!(g.locate("Atlantis"), None);
    }

    #[test]
    fn gazetteer_rejects_out_of_range() {
        let err = Gazetteer::from_entries([("Nowhere", GeoCoord::new(120.0, 0.0))]).unwrap_err();
        assert!(matches!(err, FlightError::InvalidCoordinate { .. }));
    }

    #[test]
    fn gazetteer_loads_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "Japan": {{ "lat": 36.2, "lon": 138.3 }}, "Chile": {{ "lat": -35.7, "lon": -71.5 }} }}"#
        )
        .unwrap();
        let g = Gazetteer::load_json(file.path()).unwrap();
        assert_eq!(g.len(), 2);
        assert_eq!(g.locate("chile"), Some(GeoCoord::new(-35.7, -71.5)));
    }

    #[test]
    fn gazetteer_load_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2").unwrap();
        assert!(matches!(
            Gazetteer::load_json(file.path()),
            Err(FlightError::Json(_))
        ));
    }

    #[test]
    fn timeout_passes_fast_answers_through() {
        let g = TimeoutGeocoder::new(Slow(Duration::ZERO), Duration::from_secs(5));
        assert_eq!(g.locate("x"), Some(GeoCoord::new(1.0, 2.0)));
    }

    #[test]
    fn timeout_gives_up_on_stalled_lookup() {
        let g = TimeoutGeocoder::new(Slow(Duration::from_millis(500)), Duration::from_millis(20));
        let start = Instant::now();
        assert_eq!(g.locate("x"), None);
        assert!(start.elapsed() < Duration::from_millis(400));
    }
}
