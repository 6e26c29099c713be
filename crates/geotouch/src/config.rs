//! JSON configuration for the interactive map.

use geotouch_compose::CompositorStyle;
use geotouch_core::FrameSize;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn default_map_size() -> [usize; 2] {
    [1920, 1080]
}

fn default_calibration_path() -> PathBuf {
    PathBuf::from("calibration.json")
}

fn default_regions_path() -> PathBuf {
    PathBuf::from("regions.json")
}

fn default_highlight_opacity() -> f32 {
    0.65
}

fn default_info_opacity() -> f32 {
    1.0
}

fn default_authoring_fill_opacity() -> f32 {
    0.5
}

fn default_highlight_color() -> [u8; 3] {
    [0, 0, 255]
}

fn default_path_color() -> [u8; 3] {
    [255, 255, 0]
}

fn default_path_thickness() -> f32 {
    5.0
}

fn default_tip_radius() -> f32 {
    7.0
}

fn default_lookup_timeout_ms() -> u64 {
    2000
}

fn default_lookup_retry_ms() -> u64 {
    5000
}

/// Application settings. Every field has a default, so a partial file (or
/// `{}`) loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoTouchConfig {
    /// Map-space rectangle `[width, height]` the calibrated surface is
    /// warped into.
    #[serde(default = "default_map_size")]
    pub map_size: [usize; 2],
    #[serde(default = "default_calibration_path")]
    pub calibration_path: PathBuf,
    #[serde(default = "default_regions_path")]
    pub regions_path: PathBuf,
    #[serde(default = "default_highlight_opacity")]
    pub highlight_opacity: f32,
    #[serde(default = "default_info_opacity")]
    pub info_opacity: f32,
    #[serde(default = "default_authoring_fill_opacity")]
    pub authoring_fill_opacity: f32,
    /// RGB.
    #[serde(default = "default_highlight_color")]
    pub highlight_color: [u8; 3],
    #[serde(default = "default_path_color")]
    pub path_color: [u8; 3],
    #[serde(default = "default_path_thickness")]
    pub path_thickness: f32,
    #[serde(default = "default_tip_radius")]
    pub tip_radius: f32,
    /// Upper bound on a single geocoder lookup.
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
    /// How long a name that failed to resolve is left alone before the
    /// geocoder is asked again. `0` retries on every frame.
    #[serde(default = "default_lookup_retry_ms")]
    pub lookup_retry_ms: u64,
    /// JSON gazetteer used to place region names on the globe.
    #[serde(default)]
    pub gazetteer_path: Option<PathBuf>,
}

impl Default for GeoTouchConfig {
    fn default() -> Self {
        Self {
            map_size: default_map_size(),
            calibration_path: default_calibration_path(),
            regions_path: default_regions_path(),
            highlight_opacity: default_highlight_opacity(),
            info_opacity: default_info_opacity(),
            authoring_fill_opacity: default_authoring_fill_opacity(),
            highlight_color: default_highlight_color(),
            path_color: default_path_color(),
            path_thickness: default_path_thickness(),
            tip_radius: default_tip_radius(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
            lookup_retry_ms: default_lookup_retry_ms(),
            gazetteer_path: None,
        }
    }
}

impl GeoTouchConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn map_size(&self) -> FrameSize {
        FrameSize::from(self.map_size)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    pub fn lookup_retry(&self) -> Duration {
        Duration::from_millis(self.lookup_retry_ms)
    }

    /// Drawing parameters; anything the config does not name keeps the
    /// [`CompositorStyle`] default.
    pub fn style(&self) -> CompositorStyle {
        CompositorStyle {
            highlight_opacity: self.highlight_opacity,
            info_opacity: self.info_opacity,
            authoring_fill_opacity: self.authoring_fill_opacity,
            highlight_color: self.highlight_color,
            path_color: self.path_color,
            path_thickness: self.path_thickness,
            tip_radius: self.tip_radius,
            ..CompositorStyle::default()
        }
    }
}
