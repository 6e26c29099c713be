//! Interactive map: touch a printed or projected map with a finger and see
//! the region under it highlighted on the live camera feed.
//!
//! This crate ties the workspace together:
//! - [`AuthoringSession`]: calibrate the camera against the map and draw
//!   named regions on it,
//! - [`FramePipeline`]: per frame, track up to two fingertips, classify them
//!   against the region store, and compose highlights (plus a flight panel
//!   when two different regions are touched) back onto the camera frame,
//! - [`GeoTouchConfig`]: JSON settings.
//!
//! The fingertip tracker and the geocoder are injected capabilities
//! ([`PointTracker`], [`flight::Geocoder`]).
//!
//! ## Quickstart
//!
//! ```
//! use geotouch::{
//!     CompositorStyle, FixtureTracker, Frame, FramePipeline, FrameSize, MapTransform, Point2,
//!     RegionStore,
//! };
//!
//! let map_size = FrameSize::new(1920, 1080);
//! let calib = [
//!     Point2::new(100.0, 100.0),
//!     Point2::new(1800.0, 120.0),
//!     Point2::new(90.0, 1000.0),
//!     Point2::new(1830.0, 980.0),
//! ];
//! let transform = MapTransform::from_calibration(&calib, map_size).unwrap();
//!
//! let mut regions = RegionStore::new();
//! regions
//!     .add_region(
//!         "Testland",
//!         vec![
//!             Point2::new(200.0, 200.0),
//!             Point2::new(600.0, 200.0),
//!             Point2::new(600.0, 600.0),
//!             Point2::new(200.0, 600.0),
//!         ],
//!     )
//!     .unwrap();
//!
//! let fingertip = transform.map_to_camera(Point2::new(400.0, 400.0)).unwrap();
//! let mut tracker = FixtureTracker::constant(vec![fingertip]);
//! let mut pipeline = FramePipeline::new(CompositorStyle::default()).with_transform(transform);
//!
//! let frame = Frame::black(FrameSize::new(1920, 1080));
//! let report = pipeline.process(&frame.view(), &regions, &mut tracker);
//! assert_eq!(report.detections[0].regions, vec!["Testland".to_string()]);
//! ```
//!
//! ## API map
//! - `geotouch::core`: homographies, frames, warping.
//! - `geotouch::regions`: region and calibration stores, hit-testing.
//! - `geotouch::compose`: rasterizing and blending overlay layers.
//! - `geotouch::flight`: great-circle distance, flight time, geocoding.
//! - `geotouch::imageio` (feature `image`): `image` crate interop.

pub use geotouch_compose as compose;
pub use geotouch_core as core;
pub use geotouch_flight as flight;
pub use geotouch_regions as regions;

pub use geotouch_compose::{CompositorStyle, NoText, TextPainter};
pub use geotouch_core::{Frame, FrameSize, FrameView, GeoError, Layer, MapTransform, Point2};
pub use geotouch_flight::{FlightInfo, FlightInfoService, FlightLookup, Gazetteer};
pub use geotouch_regions::{CalibrationStore, LoadOutcome, Region, RegionError, RegionStore};

mod authoring;
mod config;
mod error;
pub mod overlay;
mod pipeline;
mod tracker;

#[cfg(feature = "image")]
pub mod imageio;

pub use authoring::{render_authoring_view, AuthoringMode, AuthoringSession, Click};
pub use config::{ConfigError, GeoTouchConfig};
pub use error::PipelineError;
pub use pipeline::{FramePipeline, FrameReport, FrameStage, PointDetection};
pub use tracker::{FixtureTracker, PointTracker, MAX_TRACKED_POINTS};
