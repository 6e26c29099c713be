//! Per-frame detection loop body.

use crate::overlay::{draw_map_highlights, draw_markers, flight_info_lines};
use crate::tracker::{PointTracker, MAX_TRACKED_POINTS};
use geotouch_compose::{
    compose_overlay, draw_info_box, inverse_project, CompositorStyle, NoText, TextPainter,
};
use geotouch_core::{Frame, FrameSize, FrameView, GeoError, Layer, MapTransform};
use geotouch_flight::{FlightInfo, FlightLookup};
use geotouch_regions::{classify_indices, CalibrationStore, Region, RegionStore};
use log::{debug, warn};
use nalgebra::Point2;
use serde::Serialize;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// States a frame passes through, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStage {
    NoPointsTracked,
    RegionsClassified,
    InfoOverlayRequested,
    Composed,
}

/// One tracked fingertip and what it hit.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PointDetection {
    /// Camera-space position from the tracker.
    pub camera: [f32; 2],
    /// Map-space position; `None` when the point maps to infinity.
    pub map: Option<[f32; 2]>,
    /// Names of the containing regions, in store order.
    pub regions: Vec<String>,
}

/// Result of [`FramePipeline::process`].
#[derive(Clone, Debug, Serialize)]
pub struct FrameReport {
    pub stages: Vec<FrameStage>,
    pub detections: Vec<PointDetection>,
    pub flight: Option<FlightInfo>,
    #[serde(skip)]
    pub frame: Frame,
}

/// Stages and detections gathered before the output frame exists.
struct PendingReport {
    stages: Vec<FrameStage>,
    detections: Vec<PointDetection>,
    flight: Option<FlightInfo>,
}

impl PendingReport {
    fn finish(self, frame: Frame) -> FrameReport {
        FrameReport {
            stages: self.stages,
            detections: self.detections,
            flight: self.flight,
            frame,
        }
    }
}

fn copy_frame(frame: &FrameView<'_>) -> Frame {
    Frame {
        width: frame.width,
        height: frame.height,
        data: frame.data.to_vec(),
    }
}

impl FrameReport {
    pub fn visited(&self, stage: FrameStage) -> bool {
        self.stages.contains(&stage)
    }

    pub fn info_requested(&self) -> bool {
        self.visited(FrameStage::InfoOverlayRequested)
    }
}

/// Dual-point flight mode: exactly two points, each inside exactly one
/// region, and the two names differ.
fn flight_pair(detections: &[PointDetection]) -> Option<(&str, &str)> {
    match detections {
        [a, b] if a.regions.len() == 1 && b.regions.len() == 1 => {
            let (from, to) = (a.regions[0].as_str(), b.regions[0].as_str());
            (from != to).then_some((from, to))
        }
        _ => None,
    }
}

/// Blend `layer` over `out`, keeping `out` if the blend fails.
fn blend(out: Frame, layer: &Layer, opacity: f32) -> Frame {
    if layer.is_empty() {
        return out;
    }
    match compose_overlay(&out.view(), layer, opacity) {
        Ok(composed) => composed,
        Err(err) => {
            warn!("overlay skipped: {err}");
            out
        }
    }
}

/// Map each camera point into map space and classify it. Also returns the
/// matched region indices (store order) and the map-space tips.
fn locate_points(
    t: &MapTransform,
    points: &[Point2<f32>],
    regions: &[Region],
) -> (Vec<PointDetection>, Vec<usize>, Vec<Point2<f32>>) {
    let mut detections = Vec::with_capacity(points.len());
    let mut hit = Vec::new();
    let mut tips = Vec::with_capacity(points.len());
    for &p in points {
        let map = match t.camera_to_map(p) {
            Ok(m) => Some(m),
            Err(err) => {
                warn!("dropping tracked point ({}, {}): {err}", p.x, p.y);
                None
            }
        };
        let idx = map.map(|m| classify_indices(m, regions)).unwrap_or_default();
        detections.push(PointDetection {
            camera: [p.x, p.y],
            map: map.map(|m| [m.x, m.y]),
            regions: idx.iter().map(|&i| regions[i].name().to_string()).collect(),
        });
        for i in idx {
            if !hit.contains(&i) {
                hit.push(i);
            }
        }
        tips.extend(map);
    }
    hit.sort_unstable();
    (detections, hit, tips)
}

/// Owns the current transform and drawing settings; reads the region store
/// once per frame and never writes to it.
pub struct FramePipeline {
    transform: Option<MapTransform>,
    style: CompositorStyle,
    flights: Option<Box<dyn FlightLookup>>,
    painter: Box<dyn TextPainter>,
}

impl FramePipeline {
    pub fn new(style: CompositorStyle) -> Self {
        Self {
            transform: None,
            style,
            flights: None,
            painter: Box::new(NoText),
        }
    }

    pub fn with_transform(mut self, transform: MapTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_flights(mut self, flights: impl FlightLookup + 'static) -> Self {
        self.flights = Some(Box::new(flights));
        self
    }

    pub fn with_text_painter(mut self, painter: impl TextPainter + 'static) -> Self {
        self.painter = Box::new(painter);
        self
    }

    pub fn style(&self) -> &CompositorStyle {
        &self.style
    }

    pub fn transform(&self) -> Option<&MapTransform> {
        self.transform.as_ref()
    }

    /// Recompute the transform from a complete calibration. On failure the
    /// previous transform (if any) stays in place.
    pub fn recalibrate(
        &mut self,
        calibration: &CalibrationStore,
        map_size: FrameSize,
    ) -> Result<&MapTransform, GeoError> {
        let fresh = MapTransform::from_points(calibration.points(), map_size)?;
        Ok(self.transform.insert(fresh))
    }

    /// Run one frame: track, classify, draw highlights in map space, project
    /// them back, and add the flight panel when two distinct regions are
    /// touched. `frame` is never modified.
    ///
    /// A frame whose buffer does not match its size is not tracked; the
    /// report carries a black frame of the claimed size.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(w = frame.width, h = frame.height))
    )]
    pub fn process(
        &mut self,
        frame: &FrameView<'_>,
        regions: &RegionStore,
        tracker: &mut dyn PointTracker,
    ) -> FrameReport {
        let mut report = PendingReport {
            stages: Vec::with_capacity(4),
            detections: Vec::new(),
            flight: None,
        };

        if let Err(err) = frame.validate() {
            warn!("frame skipped: {err}");
            report.stages.push(FrameStage::Composed);
            return report.finish(Frame::black(frame.size()));
        }

        let mut points = tracker.detect_points(frame);
        if points.len() > MAX_TRACKED_POINTS {
            debug!("tracker returned {} points, keeping 2", points.len());
            points.truncate(MAX_TRACKED_POINTS);
        }

        if points.is_empty() {
            report.stages.push(FrameStage::NoPointsTracked);
            report.stages.push(FrameStage::Composed);
            return report.finish(copy_frame(frame));
        }

        let Some(t) = self.transform else {
            debug!("no calibration, frame passed through");
            report.stages.push(FrameStage::Composed);
            return report.finish(copy_frame(frame));
        };

        let all = regions.all();
        let (detections, hit, tips) = locate_points(&t, &points, all);
        report.detections = detections;
        report.stages.push(FrameStage::RegionsClassified);

        let mut map_layer = Layer::transparent(t.map_size);
        let matched: Vec<&Region> = hit.iter().map(|&i| &all[i]).collect();
        draw_map_highlights(&mut map_layer, &matched, &tips, &self.style);

        let size = frame.size();
        let mut out = copy_frame(frame);
        if !map_layer.is_empty() {
            match inverse_project(&map_layer, &t.camera_from_map, size) {
                Ok(cam) => out = blend(out, &cam, self.style.highlight_opacity),
                Err(err) => warn!("highlight projection skipped: {err}"),
            }
        }

        let mut info_layer = Layer::transparent(size);
        draw_markers(
            &mut info_layer,
            &points,
            self.style.camera_tip_color,
            self.style.tip_radius,
        );

        if let Some((from, to)) = flight_pair(&report.detections) {
            report.stages.push(FrameStage::InfoOverlayRequested);
            report.flight = match self.flights.as_mut() {
                Some(flights) => flights.flight_info(from, to),
                None => None,
            };
            match &report.flight {
                Some(info) => draw_info_box(
                    &mut info_layer,
                    &self.style.info_box,
                    &flight_info_lines(info),
                    self.painter.as_mut(),
                ),
                None => debug!("no flight info for {from} -> {to}"),
            }
        }

        out = blend(out, &info_layer, self.style.info_opacity);
        report.stages.push(FrameStage::Composed);
        report.finish(out)
    }
}
