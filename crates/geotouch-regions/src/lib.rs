//! Map-space regions and calibration state.
//!
//! - [`RegionStore`]: ordered named polygons with append / undo / bulk
//!   replace and JSON persistence,
//! - [`CalibrationStore`]: the 4 camera-space calibration corners,
//! - [`classify`]: boundary-inclusive hit-testing of a point against regions.
//!
//! Loading never fails: a missing file gives an empty store, a corrupt one
//! gives an empty store plus a logged warning (see [`LoadOutcome`]).
//!
//! ```
//! use geotouch_regions::RegionStore;
//! use nalgebra::Point2;
//!
//! let mut store = RegionStore::new();
//! store
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
//! assert_eq!(store.classify(Point2::new(400.0, 400.0)), vec!["Testland"]);
//! ```

mod calibration;
mod hit_test;
mod io;
mod region;
mod store;

pub use calibration::{CalibrationStore, CALIBRATION_POINTS};
pub use hit_test::{classify, classify_indices, contains_point, BOUNDARY_TOLERANCE};
pub use io::{LoadOutcome, StoreIoError};
pub use region::{Bounds, Region, RegionError};
pub use store::RegionStore;
