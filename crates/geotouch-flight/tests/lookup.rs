use approx::assert_abs_diff_eq;
use geotouch_flight::{
    FlightInfoService, FlightLookup, Gazetteer, GeoCoord, Geocoder, TimeoutGeocoder,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn places_file() -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(
        file.path(),
        r#"{
            "France": { "lat": 46.2276, "lon": 2.2137 },
            "Japan": { "lat": 36.2048, "lon": 138.2529 },
            "Ecuador": { "lat": -1.8312, "lon": -78.1834 }
        }"#,
    )
    .unwrap();
    file
}

#[test]
fn gazetteer_behind_timeout_answers_normally() {
    let file = places_file();
    let gazetteer = Gazetteer::load_json(file.path()).unwrap();
    let mut service =
        FlightInfoService::new(TimeoutGeocoder::new(gazetteer, Duration::from_secs(2)));

    let info = service.flight_info("France", "Japan").expect("known pair");
    assert_eq!(info.from, "France");
    assert!(info.distance_km > 9000.0 && info.distance_km < 10500.0);
    // 2-decimal rounding
    assert_abs_diff_eq!(info.distance_km * 100.0, (info.distance_km * 100.0).round(), epsilon = 1e-6);

    let southern = service.flight_info("Ecuador", "Japan").expect("known pair");
    assert!(southern.flight_time_hours > southern.distance_km / 800.0);
}

struct Stalled {
    calls: Arc<AtomicUsize>,
}

impl Geocoder for Stalled {
    fn locate(&self, _: &str) -> Option<GeoCoord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(300));
        Some(GeoCoord::new(0.0, 0.0))
    }
}

fn stalled(calls: &Arc<AtomicUsize>) -> TimeoutGeocoder<Stalled> {
    TimeoutGeocoder::new(
        Stalled {
            calls: Arc::clone(calls),
        },
        Duration::from_millis(20),
    )
}

#[test]
fn stalled_geocoder_gives_no_info_and_is_retried_later() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut service = FlightInfoService::new(stalled(&calls));

    let start = Instant::now();
    assert!(service.flight_info("A", "B").is_none());
    assert!(service.flight_info("A", "B").is_none());
    assert!(start.elapsed() < Duration::from_millis(250));
    // timeouts are not remembered, both names are asked again
    assert!(calls.load(Ordering::SeqCst) <= 4);
    assert!(service.cached("A", "B").is_none());
}

#[test]
fn retry_window_skips_recently_stalled_names() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut service =
        FlightInfoService::new(stalled(&calls)).with_retry_after(Duration::from_secs(30));

    let start = Instant::now();
    for _ in 0..5 {
        assert!(service.flight_info("A", "B").is_none());
    }
    assert!(start.elapsed() < Duration::from_millis(250));
    assert!(calls.load(Ordering::SeqCst) <= 2);
}
