use geotouch_compose::ComposeError;
use geotouch_core::GeoError;
use geotouch_flight::FlightError;
use geotouch_regions::{RegionError, StoreIoError};

use crate::config::ConfigError;

/// Errors surfaced by the facade helpers and the CLI. The per-frame loop
/// itself does not return these; it logs and falls back instead.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Geometry(#[from] GeoError),
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Region(#[from] RegionError),
    #[error(transparent)]
    Store(#[from] StoreIoError),
    #[error(transparent)]
    Flight(#[from] FlightError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("calibration is not complete ({got} of 4 points)")]
    NotCalibrated { got: usize },
    #[cfg(feature = "image")]
    #[error(transparent)]
    Image(#[from] ::image::ImageError),
}
