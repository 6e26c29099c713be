use geotouch_core::{
    warp_layer, Frame, FrameSize, FrameView, GeoError, Homography, Layer, RGBA_CHANNELS,
    RGB_CHANNELS,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ComposeError {
    #[error("layer is {layer_w}x{layer_h} but base frame is {base_w}x{base_h}")]
    SizeMismatch {
        base_w: usize,
        base_h: usize,
        layer_w: usize,
        layer_h: usize,
    },
    #[error(transparent)]
    Geometry(#[from] GeoError),
}

/// Blend `layer` over `base` and return a new frame; `base` is only read.
///
/// Per pixel, with `a = opacity * alpha / 255`:
/// `out = base * (1 - a) + layer * a`. Pixels with zero coverage are copied
/// through unchanged.
pub fn compose_overlay(
    base: &FrameView<'_>,
    layer: &Layer,
    opacity: f32,
) -> Result<Frame, ComposeError> {
    if base.width != layer.width || base.height != layer.height {
        return Err(ComposeError::SizeMismatch {
            base_w: base.width,
            base_h: base.height,
            layer_w: layer.width,
            layer_h: layer.height,
        });
    }
    base.validate()?;

    let opacity = opacity.clamp(0.0, 1.0);
    let mut data = base.data.to_vec();
    for (dst, src) in data
        .chunks_exact_mut(RGB_CHANNELS)
        .zip(layer.data.chunks_exact(RGBA_CHANNELS))
    {
        if src[3] == 0 {
            continue;
        }
        let a = opacity * src[3] as f32 / 255.0;
        for c in 0..RGB_CHANNELS {
            let v = dst[c] as f32 * (1.0 - a) + src[c] as f32 * a;
            dst[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }

    Ok(Frame {
        width: base.width,
        height: base.height,
        data,
    })
}

/// Warp a map-space layer back into camera space with `camera_from_map`.
/// Content falling outside `dst_size` is clipped, not an error.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(map_layer, camera_from_map))
)]
pub fn inverse_project(
    map_layer: &Layer,
    camera_from_map: &Homography,
    dst_size: FrameSize,
) -> Result<Layer, GeoError> {
    warp_layer(map_layer, camera_from_map, dst_size)
}
