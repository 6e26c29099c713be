//! Info panel drawn in camera space.
//!
//! Glyph rendering is not done here: the panel hands each line to a
//! [`TextPainter`] supplied by the host (GUI toolkit, font rasterizer, ...).

use crate::raster::{fill_rect, stroke_rect};
use geotouch_core::Layer;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Renders one line of text onto a layer. `origin` is the left end of the
/// baseline.
pub trait TextPainter {
    fn draw_text(
        &mut self,
        layer: &mut Layer,
        text: &str,
        origin: Point2<f32>,
        scale: f32,
        rgb: [u8; 3],
    );
}

/// Painter that draws nothing; panels and outlines still render.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoText;

impl TextPainter for NoText {
    fn draw_text(&mut self, _: &mut Layer, _: &str, _: Point2<f32>, _: f32, _: [u8; 3]) {}
}

/// One text line of the panel; `baseline` is measured from the panel top.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub scale: f32,
    pub baseline: f32,
}

impl TextLine {
    pub fn new(text: impl Into<String>, scale: f32, baseline: f32) -> Self {
        Self {
            text: text.into(),
            scale,
            baseline,
        }
    }
}

/// Panel geometry, anchored to the bottom-left corner of the frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InfoBoxLayout {
    pub width: i64,
    pub height: i64,
    pub margin: i64,
    pub border: i64,
    pub text_inset: f32,
    pub background: [u8; 3],
    pub foreground: [u8; 3],
}

impl Default for InfoBoxLayout {
    fn default() -> Self {
        Self {
            width: 400,
            height: 200,
            margin: 50,
            border: 2,
            text_inset: 20.0,
            background: [0, 0, 0],
            foreground: [255, 255, 255],
        }
    }
}

impl InfoBoxLayout {
    /// Top-left corner of the panel on a layer of the given height.
    pub fn origin(&self, layer_height: usize) -> (i64, i64) {
        (self.margin, layer_height as i64 - self.height - self.margin)
    }
}

/// Draw the panel and its text lines onto `layer`.
pub fn draw_info_box(
    layer: &mut Layer,
    layout: &InfoBoxLayout,
    lines: &[TextLine],
    painter: &mut dyn TextPainter,
) {
    let (x, y) = layout.origin(layer.height);
    fill_rect(layer, x, y, layout.width, layout.height, layout.background);
    stroke_rect(
        layer,
        x,
        y,
        layout.width,
        layout.height,
        layout.border,
        layout.foreground,
    );
    for line in lines {
        let origin = Point2::new(x as f32 + layout.text_inset, y as f32 + line.baseline);
        painter.draw_text(layer, &line.text, origin, line.scale, layout.foreground);
    }
}
