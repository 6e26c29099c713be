//! Core geometry for camera-to-map calibration.
//!
//! A calibrated planar surface is described by 4 camera-space points that map
//! onto the corners of a fixed "map space" rectangle. This crate computes the
//! forward/inverse homography pair, transforms single points, and warps whole
//! frames or overlay layers between the two spaces.
//!
//! It does not depend on any camera, tracker or image codec.
//!
//! ```
//! use geotouch_core::{FrameSize, MapTransform};
//! use nalgebra::Point2;
//!
//! let calib = [
//!     Point2::new(100.0, 100.0),
//!     Point2::new(1800.0, 120.0),
//!     Point2::new(90.0, 1000.0),
//!     Point2::new(1830.0, 980.0),
//! ];
//! let t = MapTransform::from_calibration(&calib, FrameSize::new(1920, 1080)).unwrap();
//! let p = t.camera_to_map(Point2::new(960.0, 540.0)).unwrap();
//! assert!(p.x > 0.0 && p.y > 0.0);
//! ```

mod error;
mod homography;
mod image;
mod logger;
mod transform;

pub use error::GeoError;
pub use homography::{
    estimate_homography, has_collinear_triple, homography_from_4pt, Homography, PROJECTIVE_EPS,
};
pub use image::{
    sample_bilinear_rgb, sample_bilinear_rgba, Frame, FrameSize, FrameView, Layer, RGBA_CHANNELS,
    RGB_CHANNELS,
};
pub use transform::{compute_forward, map_corners, warp_frame, warp_layer, MapTransform};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;
pub use logger::{init_with_level, level_from_verbosity};

pub use nalgebra::Point2;
