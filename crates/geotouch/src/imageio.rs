//! Conversions between `image` buffers and the core frame types.

use crate::PipelineError;
use geotouch_core::{Frame, FrameView, GeoError};
use image::RgbImage;
use std::path::Path;

/// Borrow an `image::RgbImage` as a core view.
pub fn rgb_view(img: &RgbImage) -> Result<FrameView<'_>, PipelineError> {
    Ok(FrameView::new(
        img.width() as usize,
        img.height() as usize,
        img.as_raw(),
    )?)
}

pub fn frame_from_rgb(img: RgbImage) -> Frame {
    Frame {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.into_raw(),
    }
}

pub fn frame_to_rgb(frame: Frame) -> Result<RgbImage, PipelineError> {
    let expected = frame.size().area() * 3;
    let got = frame.data.len();
    RgbImage::from_raw(frame.width as u32, frame.height as u32, frame.data)
        .ok_or(PipelineError::Geometry(GeoError::InvalidFrameBuffer { expected, got }))
}

/// Decode any format `image` understands into an RGB frame.
pub fn load_frame(path: impl AsRef<Path>) -> Result<Frame, PipelineError> {
    let img = image::open(path)?.to_rgb8();
    Ok(frame_from_rgb(img))
}

/// Encode a frame; the format follows the file extension.
pub fn save_frame(frame: Frame, path: impl AsRef<Path>) -> Result<(), PipelineError> {
    frame_to_rgb(frame)?.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotouch_core::FrameSize;

    #[test]
    fn rgb_round_trip_keeps_pixels() {
        let mut frame = Frame::black(FrameSize::new(3, 2));
        frame.set_pixel(2, 1, [10, 20, 30]);
        let img = frame_to_rgb(frame.clone()).unwrap();
        assert_eq!(img.get_pixel(2, 1).0, [10, 20, 30]);
        assert_eq!(rgb_view(&img).unwrap().data, frame.data.as_slice());
        assert_eq!(frame_from_rgb(img), frame);
    }

    #[test]
    fn png_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.png");
        let frame = Frame::filled(FrameSize::new(4, 4), [1, 2, 3]);
        save_frame(frame.clone(), &path).unwrap();
        assert_eq!(load_frame(&path).unwrap(), frame);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let frame = Frame {
            width: 2,
            height: 2,
            data: vec![0; 5],
        };
        assert!(matches!(
            frame_to_rgb(frame),
            Err(PipelineError::Geometry(GeoError::InvalidFrameBuffer {
                expected: 12,
                got: 5
            }))
        ));
    }
}
