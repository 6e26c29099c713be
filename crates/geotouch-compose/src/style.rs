use crate::InfoBoxLayout;
use serde::{Deserialize, Serialize};

/// Colours, weights and sizes used when drawing overlays. Colours are RGB.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorStyle {
    /// Blend weight of the inverse-projected highlight layer.
    pub highlight_opacity: f32,
    /// Blend weight of the camera-space info layer.
    pub info_opacity: f32,
    /// Blend weight of region fills in the authoring view.
    pub authoring_fill_opacity: f32,
    pub highlight_color: [u8; 3],
    pub outline_color: [u8; 3],
    pub label_color: [u8; 3],
    pub path_color: [u8; 3],
    pub path_thickness: f32,
    pub outline_thickness: f32,
    pub camera_tip_color: [u8; 3],
    pub map_tip_color: [u8; 3],
    pub tip_radius: f32,
    pub info_box: InfoBoxLayout,
}

impl Default for CompositorStyle {
    fn default() -> Self {
        Self {
            highlight_opacity: 0.65,
            info_opacity: 1.0,
            authoring_fill_opacity: 0.5,
            highlight_color: [0, 0, 255],
            outline_color: [0, 0, 255],
            label_color: [0, 255, 0],
            path_color: [255, 255, 0],
            path_thickness: 5.0,
            outline_thickness: 5.0,
            camera_tip_color: [255, 0, 0],
            map_tip_color: [0, 255, 0],
            tip_radius: 7.0,
            info_box: InfoBoxLayout::default(),
        }
    }
}
