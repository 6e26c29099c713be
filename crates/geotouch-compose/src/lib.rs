//! Overlay drawing and compositing.
//!
//! Overlays are drawn on sparse RGBA [`Layer`](geotouch_core::Layer)s (alpha
//! is coverage), optionally warped from map space back into camera space
//! with [`inverse_project`], then blended with [`compose_overlay`]. Every
//! step returns a new buffer; the camera frame is never drawn on in place.

mod compose;
mod info;
pub mod raster;
mod style;

pub use compose::{compose_overlay, inverse_project, ComposeError};
pub use info::{draw_info_box, InfoBoxLayout, NoText, TextLine, TextPainter};
pub use style::CompositorStyle;
