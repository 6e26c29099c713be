//! Camera <-> map space transform pair and perspective warping.

use crate::{
    homography_from_4pt, sample_bilinear_rgb, sample_bilinear_rgba, Frame, FrameSize, FrameView,
    GeoError, Homography, Layer, RGBA_CHANNELS, RGB_CHANNELS,
};
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Map-space corners in calibration order: top-left, top-right, bottom-left,
/// bottom-right.
pub fn map_corners(map_size: FrameSize) -> [Point2<f32>; 4] {
    let w = map_size.width as f32;
    let h = map_size.height as f32;
    [
        Point2::new(0.0, 0.0),
        Point2::new(w, 0.0),
        Point2::new(0.0, h),
        Point2::new(w, h),
    ]
}

/// Forward homography (camera -> map) for 4 calibration points given in the
/// [`map_corners`] order.
pub fn compute_forward(
    calibration: &[Point2<f32>; 4],
    map_size: FrameSize,
) -> Result<Homography, GeoError> {
    homography_from_4pt(calibration, &map_corners(map_size))
}

/// A validated forward/inverse homography pair between camera space and the
/// `map_size` rectangle. Cheap to copy and reuse across frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapTransform {
    pub map_from_camera: Homography,
    pub camera_from_map: Homography,
    pub map_size: FrameSize,
}

impl MapTransform {
    pub fn from_calibration(
        calibration: &[Point2<f32>; 4],
        map_size: FrameSize,
    ) -> Result<Self, GeoError> {
        let map_from_camera = compute_forward(calibration, map_size)?;
        let camera_from_map = map_from_camera.inverse()?;
        Ok(Self {
            map_from_camera,
            camera_from_map,
            map_size,
        })
    }

    /// Same as [`MapTransform::from_calibration`] for a slice; fails unless it
    /// holds exactly 4 points.
    pub fn from_points(points: &[Point2<f32>], map_size: FrameSize) -> Result<Self, GeoError> {
        let quad: &[Point2<f32>; 4] = points
            .try_into()
            .map_err(|_| GeoError::InvalidCalibrationLength { got: points.len() })?;
        Self::from_calibration(quad, map_size)
    }

    #[inline]
    pub fn camera_to_map(&self, p: Point2<f32>) -> Result<Point2<f32>, GeoError> {
        self.map_from_camera.try_apply(p)
    }

    #[inline]
    pub fn map_to_camera(&self, p: Point2<f32>) -> Result<Point2<f32>, GeoError> {
        self.camera_from_map.try_apply(p)
    }

    /// Camera-space outline of the whole map rectangle, in drawing order
    /// (TL, TR, BR, BL).
    pub fn camera_quad(&self) -> Result<[Point2<f32>; 4], GeoError> {
        let [tl, tr, bl, br] = map_corners(self.map_size);
        Ok([
            self.map_to_camera(tl)?,
            self.map_to_camera(tr)?,
            self.map_to_camera(br)?,
            self.map_to_camera(bl)?,
        ])
    }
}

/// Resample `src` under `forward` (source -> destination) into a new frame of
/// `dst_size`. Destination pixels whose preimage falls outside the source are
/// black.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(src, forward), fields(w = dst_size.width, h = dst_size.height))
)]
pub fn warp_frame(
    src: &FrameView<'_>,
    forward: &Homography,
    dst_size: FrameSize,
) -> Result<Frame, GeoError> {
    src.validate()?;
    let src_from_dst = forward.inverse()?;
    let mut out = Frame::black(dst_size);

    for y in 0..dst_size.height {
        for x in 0..dst_size.width {
            let ps = src_from_dst.apply(Point2::new(x as f32, y as f32));
            if !(ps.x.is_finite() && ps.y.is_finite()) {
                continue;
            }
            let rgb = sample_bilinear_rgb(src, ps.x, ps.y);
            let i = (y * dst_size.width + x) * RGB_CHANNELS;
            out.data[i..i + RGB_CHANNELS].copy_from_slice(&rgb);
        }
    }
    Ok(out)
}

/// Like [`warp_frame`] for an RGBA layer. Coverage outside the source layer
/// is zero, so content that leaves the visible area is clipped.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(src, forward), fields(w = dst_size.width, h = dst_size.height))
)]
pub fn warp_layer(
    src: &Layer,
    forward: &Homography,
    dst_size: FrameSize,
) -> Result<Layer, GeoError> {
    let src_from_dst = forward.inverse()?;
    let mut out = Layer::transparent(dst_size);

    for y in 0..dst_size.height {
        for x in 0..dst_size.width {
            let ps = src_from_dst.apply(Point2::new(x as f32, y as f32));
            if !(ps.x.is_finite() && ps.y.is_finite()) {
                continue;
            }
            let rgba = sample_bilinear_rgba(src, ps.x, ps.y);
            if rgba[3] == 0 {
                continue;
            }
            let i = (y * dst_size.width + x) * RGBA_CHANNELS;
            out.data[i..i + RGBA_CHANNELS].copy_from_slice(&rgba);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn scenario_calibration() -> [Point2<f32>; 4] {
        [
            Point2::new(100.0, 100.0),
            Point2::new(1800.0, 120.0),
            Point2::new(90.0, 1000.0),
            Point2::new(1830.0, 980.0),
        ]
    }

    #[test]
    fn calibration_corners_map_to_rectangle_corners() {
        let size = FrameSize::new(1920, 1080);
        let t = MapTransform::from_calibration(&scenario_calibration(), size).expect("valid");
        for (cam, map) in scenario_calibration().iter().zip(map_corners(size)) {
            let p = t.camera_to_map(*cam).expect("finite");
            assert_abs_diff_eq!(p.x, map.x, epsilon = 1e-2);
            assert_abs_diff_eq!(p.y, map.y, epsilon = 1e-2);
        }
    }

    #[test]
    fn round_trip_inside_quad() {
        let t = MapTransform::from_calibration(&scenario_calibration(), FrameSize::new(1920, 1080))
            .expect("valid");
        for p in [
            Point2::new(150.0_f32, 150.0),
            Point2::new(960.0, 540.0),
            Point2::new(1700.0, 900.0),
            Point2::new(400.5, 777.25),
        ] {
            let back = t
                .map_to_camera(t.camera_to_map(p).expect("forward"))
                .expect("inverse");
            assert_abs_diff_eq!(back.x, p.x, epsilon = 1e-3);
            assert_abs_diff_eq!(back.y, p.y, epsilon = 1e-3);
        }
    }

    #[test]
    fn from_points_requires_four() {
        let pts = scenario_calibration();
        assert_eq!(
            MapTransform::from_points(&pts[..3], FrameSize::new(10, 10)),
            Err(GeoError::InvalidCalibrationLength { got: 3 })
        );
    }

    #[test]
    fn identity_warp_copies_and_black_borders() {
        let mut src = Frame::black(FrameSize::new(4, 4));
        src.set_pixel(1, 2, [10, 20, 30]);
        let out = warp_frame(&src.view(), &Homography::identity(), FrameSize::new(6, 6))
            .expect("identity");
        assert_eq!(out.pixel(1, 2), Some([10, 20, 30]));
        assert_eq!(out.pixel(5, 5), Some([0, 0, 0]));
    }

    #[test]
    fn translated_warp_shifts_content() {
        let mut src = Frame::black(FrameSize::new(8, 8));
        src.set_pixel(2, 3, [200, 0, 0]);
        let shift = Homography::from_array([[1.0, 0.0, 3.0], [0.0, 1.0, 1.0], [0.0, 0.0, 1.0]]);
        let out = warp_frame(&src.view(), &shift, FrameSize::new(8, 8)).expect("warp");
        assert_eq!(out.pixel(5, 4), Some([200, 0, 0]));
        assert_eq!(out.pixel(2, 3), Some([0, 0, 0]));
    }

    /// Keystone view whose forward vanishing line is the camera row y = 40.
    fn keystone() -> [Point2<f32>; 4] {
        [
            Point2::new(900.0, 100.0),
            Point2::new(1020.0, 100.0),
            Point2::new(0.0, 1000.0),
            Point2::new(1920.0, 1000.0),
        ]
    }

    #[test]
    fn vanishing_line_inside_frame_warps_without_overflow() {
        let t = MapTransform::from_calibration(&keystone(), FrameSize::new(400, 300))
            .expect("valid");
        let mut map_layer = Layer::transparent(t.map_size);
        for y in 0..300 {
            for x in 0..400 {
                map_layer.put(x, y, [0, 0, 255]);
            }
        }

        // rows around y = 40 map to huge map coordinates
        let cam = warp_layer(&map_layer, &t.camera_from_map, FrameSize::new(1920, 80))
            .expect("warp");
        assert_eq!(cam.pixel(960, 40).map(|p| p[3]), Some(0));
        assert_eq!(cam.pixel(5, 70).map(|p| p[3]), Some(0));

        let frame = Frame::filled(FrameSize::new(1920, 80), [30, 30, 30]);
        let map = warp_frame(&frame.view(), &t.map_from_camera, FrameSize::new(400, 300))
            .expect("warp");
        assert_eq!(map.size(), FrameSize::new(400, 300));
    }

    #[test]
    fn warp_rejects_short_view() {
        let view = FrameView {
            width: 4,
            height: 4,
            data: &[0u8; 10],
        };
        assert!(matches!(
            warp_frame(&view, &Homography::identity(), FrameSize::new(4, 4)),
            Err(GeoError::InvalidFrameBuffer { expected: 48, got: 10 })
        ));
    }

    #[test]
    fn layer_warp_clips_outside() {
        let mut layer = Layer::transparent(FrameSize::new(4, 4));
        layer.put(0, 0, [1, 1, 1]);
        let shift = Homography::from_array([[1.0, 0.0, -2.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let out = warp_layer(&layer, &shift, FrameSize::new(4, 4)).expect("warp");
        assert!(out.is_empty());
    }
}
