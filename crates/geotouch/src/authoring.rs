//! Operator session for calibrating the camera and drawing regions.

use crate::overlay::{draw_markers, draw_region_outlines};
use crate::PipelineError;
use geotouch_compose::{compose_overlay, raster, CompositorStyle, TextPainter};
use geotouch_core::{warp_frame, Frame, FrameSize, FrameView, GeoError, Layer, MapTransform};
use geotouch_regions::{CalibrationStore, Region, RegionError, RegionStore, StoreIoError};
use log::{info, warn};
use nalgebra::Point2;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthoringMode {
    /// Clicks are camera-space calibration corners.
    Calibrate,
    /// Clicks are map-space polygon vertices.
    Regions,
}

/// What a click did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Click {
    /// Stored as calibration corner `index` (0-based).
    CalibrationPoint { index: usize },
    /// Calibration already has 4 points; reset first.
    CalibrationLocked,
    /// Appended to the in-progress polygon, which now has `count` vertices.
    PolygonVertex { count: usize },
    /// Non-finite coordinates.
    Ignored,
}

/// Explicit owned state of an authoring session: the calibration, the region
/// store, and the polygon being drawn. Nothing is written to disk until
/// [`AuthoringSession::save`].
#[derive(Clone, Debug)]
pub struct AuthoringSession {
    mode: AuthoringMode,
    map_size: FrameSize,
    calibration: CalibrationStore,
    regions: RegionStore,
    pending: Vec<Point2<f32>>,
    transform: Option<MapTransform>,
}

impl AuthoringSession {
    pub fn new(map_size: FrameSize) -> Self {
        Self::from_stores(CalibrationStore::new(), RegionStore::new(), map_size)
    }

    /// Start from loaded stores. A complete calibration puts the session in
    /// region mode; an unusable one is logged and left for the operator to
    /// reset.
    pub fn from_stores(
        calibration: CalibrationStore,
        regions: RegionStore,
        map_size: FrameSize,
    ) -> Self {
        let transform = if calibration.is_complete() {
            match MapTransform::from_points(calibration.points(), map_size) {
                Ok(t) => Some(t),
                Err(err) => {
                    warn!("stored calibration is unusable: {err}");
                    None
                }
            }
        } else {
            None
        };
        let mode = if transform.is_some() {
            AuthoringMode::Regions
        } else {
            AuthoringMode::Calibrate
        };
        Self {
            mode,
            map_size,
            calibration,
            regions,
            pending: Vec::new(),
            transform,
        }
    }

    pub fn mode(&self) -> AuthoringMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: AuthoringMode) {
        self.mode = mode;
    }

    pub fn map_size(&self) -> FrameSize {
        self.map_size
    }

    pub fn calibration(&self) -> &CalibrationStore {
        &self.calibration
    }

    pub fn regions(&self) -> &RegionStore {
        &self.regions
    }

    pub fn pending(&self) -> &[Point2<f32>] {
        &self.pending
    }

    pub fn transform(&self) -> Option<&MapTransform> {
        self.transform.as_ref()
    }

    /// Handle a mouse click.
    ///
    /// In calibration mode the 4th point triggers the homography solve. A
    /// degenerate quad is reported and the previous transform is kept; the
    /// points stay recorded until [`AuthoringSession::reset_calibration`].
    pub fn click(&mut self, p: Point2<f32>) -> Result<Click, GeoError> {
        if !(p.x.is_finite() && p.y.is_finite()) {
            return Ok(Click::Ignored);
        }
        match self.mode {
            AuthoringMode::Calibrate => {
                if !self.calibration.record_point(p) {
                    return Ok(Click::CalibrationLocked);
                }
                let index = self.calibration.len() - 1;
                if self.calibration.is_complete() {
                    let t = MapTransform::from_points(self.calibration.points(), self.map_size)?;
                    info!("calibration complete");
                    self.transform = Some(t);
                    self.mode = AuthoringMode::Regions;
                }
                Ok(Click::CalibrationPoint { index })
            }
            AuthoringMode::Regions => {
                self.pending.push(p);
                Ok(Click::PolygonVertex {
                    count: self.pending.len(),
                })
            }
        }
    }

    /// Commit the in-progress polygon under `name`. On error nothing changes
    /// and the vertices are kept so the operator can fix the name.
    pub fn commit(&mut self, name: &str) -> Result<&Region, RegionError> {
        let polygon = std::mem::take(&mut self.pending);
        match self.regions.add_region(name, polygon.clone()) {
            Ok(region) => {
                info!("added region {:?} ({} vertices)", region.name(), polygon.len());
                Ok(region)
            }
            Err(err) => {
                self.pending = polygon;
                Err(err)
            }
        }
    }

    /// Remove the most recent region.
    pub fn undo(&mut self) -> Option<Region> {
        let removed = self.regions.remove_last();
        if let Some(r) = &removed {
            info!("removed region {:?}", r.name());
        }
        removed
    }

    pub fn discard_pending(&mut self) {
        self.pending.clear();
    }

    /// Clear the calibration and go back to calibration mode.
    pub fn reset_calibration(&mut self) {
        self.calibration.reset();
        self.transform = None;
        self.mode = AuthoringMode::Calibrate;
    }

    /// Persist the region store, and the calibration when it is complete.
    pub fn save(
        &self,
        calibration_path: impl AsRef<Path>,
        regions_path: impl AsRef<Path>,
    ) -> Result<(), StoreIoError> {
        if self.calibration.is_complete() {
            self.calibration.persist(calibration_path)?;
        }
        self.regions.save(regions_path)
    }
}

/// Render the operator's view.
///
/// Before calibration this is the camera frame with a marker on each
/// recorded corner. Afterwards it is the camera frame warped into map space
/// with regions filled and outlined, names at their centroids, the
/// in-progress polygon, and `fingertip` (camera space) projected onto the
/// map.
pub fn render_authoring_view(
    frame: &FrameView<'_>,
    session: &AuthoringSession,
    fingertip: Option<Point2<f32>>,
    style: &CompositorStyle,
    painter: &mut dyn TextPainter,
) -> Result<Frame, PipelineError> {
    let Some(t) = session.transform() else {
        let base = Frame::from_raw(frame.width, frame.height, frame.data.to_vec())?;
        let mut marks = Layer::transparent(base.size());
        draw_markers(
            &mut marks,
            session.calibration().points(),
            style.camera_tip_color,
            style.tip_radius,
        );
        return Ok(compose_overlay(&base.view(), &marks, 1.0)?);
    };

    let warped = warp_frame(frame, &t.map_from_camera, t.map_size)?;

    let mut fills = Layer::transparent(t.map_size);
    for region in session.regions().all() {
        raster::fill_polygon(&mut fills, region.polygon(), style.highlight_color);
    }
    let filled = compose_overlay(&warped.view(), &fills, style.authoring_fill_opacity)?;

    let mut lines = Layer::transparent(t.map_size);
    draw_region_outlines(&mut lines, session.regions().all(), style, painter);
    raster::draw_polyline(
        &mut lines,
        session.pending(),
        false,
        style.outline_thickness,
        style.path_color,
    );
    if let Some(tip) = fingertip {
        match t.camera_to_map(tip) {
            Ok(m) => draw_markers(&mut lines, &[m], style.map_tip_color, style.tip_radius),
            Err(err) => warn!("fingertip not drawn: {err}"),
        }
    }
    Ok(compose_overlay(&filled.view(), &lines, 1.0)?)
}
