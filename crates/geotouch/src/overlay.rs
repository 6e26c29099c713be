//! Layer drawing shared by the detection pipeline and the authoring view.

use geotouch_compose::{raster, CompositorStyle, TextLine, TextPainter};
use geotouch_core::Layer;
use geotouch_flight::FlightInfo;
use geotouch_regions::Region;
use nalgebra::Point2;

/// The five lines of the flight panel.
pub fn flight_info_lines(info: &FlightInfo) -> Vec<TextLine> {
    vec![
        TextLine::new("Flight Information", 1.0, 40.0),
        TextLine::new(format!("From: {}", info.from), 0.6, 80.0),
        TextLine::new(format!("To: {}", info.to), 0.6, 110.0),
        TextLine::new(
            format!("Flight Time: {:.2} hours", info.flight_time_hours),
            0.6,
            140.0,
        ),
        TextLine::new(format!("Distance: {:.2} km", info.distance_km), 0.6, 170.0),
    ]
}

/// Map-space detection highlights: matched regions filled, a path joining
/// exactly two fingertips, and a marker on each fingertip.
pub fn draw_map_highlights(
    layer: &mut Layer,
    matched: &[&Region],
    tips: &[Point2<f32>],
    style: &CompositorStyle,
) {
    for region in matched {
        raster::fill_polygon(layer, region.polygon(), style.highlight_color);
    }
    if let [a, b] = tips {
        raster::draw_line(layer, *a, *b, style.path_thickness, style.path_color);
    }
    draw_markers(layer, tips, style.map_tip_color, style.tip_radius);
}

pub fn draw_markers(layer: &mut Layer, points: &[Point2<f32>], rgb: [u8; 3], radius: f32) {
    for p in points {
        raster::fill_disc(layer, *p, radius, rgb);
    }
}

/// Outline every region and put its name at the vertex centroid.
pub fn draw_region_outlines(
    layer: &mut Layer,
    regions: &[Region],
    style: &CompositorStyle,
    painter: &mut dyn TextPainter,
) {
    for region in regions {
        raster::draw_polyline(
            layer,
            region.polygon(),
            true,
            style.outline_thickness,
            style.outline_color,
        );
        painter.draw_text(layer, region.name(), region.centroid(), 0.6, style.label_color);
    }
}
