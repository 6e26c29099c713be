use crate::GeoError;
use serde::{Deserialize, Serialize};

/// Bytes per pixel of an RGB [`Frame`].
pub const RGB_CHANNELS: usize = 3;
/// Bytes per pixel of an RGBA [`Layer`].
pub const RGBA_CHANNELS: usize = 4;

/// Pixel dimensions of a frame, layer or of the map rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: usize,
    pub height: usize,
}

impl FrameSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl From<[usize; 2]> for FrameSize {
    fn from(wh: [usize; 2]) -> Self {
        Self::new(wh[0], wh[1])
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major RGB, len = w*h*3
}

impl<'a> FrameView<'a> {
    /// Borrow an external RGB buffer, checking its length.
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, GeoError> {
        let view = Self {
            width,
            height,
            data,
        };
        view.validate()?;
        Ok(view)
    }

    /// Fails unless `data` holds exactly `width * height` RGB pixels.
    pub fn validate(&self) -> Result<(), GeoError> {
        let expected = self.width * self.height * RGB_CHANNELS;
        if self.data.len() != expected {
            return Err(GeoError::InvalidFrameBuffer {
                expected,
                got: self.data.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }
}

/// Owned interleaved RGB image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl Frame {
    /// All-black frame.
    pub fn black(size: FrameSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            data: vec![0u8; size.area() * RGB_CHANNELS],
        }
    }

    /// Frame filled with a single colour.
    pub fn filled(size: FrameSize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(size.area() * RGB_CHANNELS);
        for _ in 0..size.area() {
            data.extend_from_slice(&rgb);
        }
        Self {
            width: size.width,
            height: size.height,
            data,
        }
    }

    /// Wrap a raw RGB buffer, checking its length.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, GeoError> {
        let expected = width * height * RGB_CHANNELS;
        if data.len() != expected {
            return Err(GeoError::InvalidFrameBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }

    #[inline]
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * RGB_CHANNELS;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y * self.width + x) * RGB_CHANNELS;
        self.data[i..i + RGB_CHANNELS].copy_from_slice(&rgb);
    }
}

/// Sparse RGBA drawing surface. Alpha is coverage: zero alpha means "nothing
/// drawn here" and leaves the base frame untouched when composed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl Layer {
    /// Fully transparent layer.
    pub fn transparent(size: FrameSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            data: vec![0u8; size.area() * RGBA_CHANNELS],
        }
    }

    #[inline]
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * RGBA_CHANNELS;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Paint an opaque pixel; out-of-bounds writes are clipped.
    #[inline]
    pub fn put(&mut self, x: i64, y: i64, rgb: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = (y as usize * self.width + x as usize) * RGBA_CHANNELS;
        self.data[i..i + 3].copy_from_slice(&rgb);
        self.data[i + 3] = 255;
    }

    /// Number of pixels with non-zero coverage.
    pub fn covered_pixels(&self) -> usize {
        self.data
            .chunks_exact(RGBA_CHANNELS)
            .filter(|px| px[3] > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.covered_pixels() == 0
    }
}

#[inline]
fn get_channel<const N: usize>(
    data: &[u8],
    width: usize,
    height: usize,
    x: i32,
    y: i32,
    c: usize,
) -> u8 {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return 0;
    }
    data.get((y as usize * width + x as usize) * N + c)
        .copied()
        .unwrap_or(0)
}

#[inline]
fn sample_bilinear_channels<const N: usize>(
    data: &[u8],
    width: usize,
    height: usize,
    x: f32,
    y: f32,
) -> [u8; N] {
    // nothing to interpolate once the 2x2 footprint is fully outside
    if !(x > -1.0 && y > -1.0 && x < width as f32 && y < height as f32) {
        return [0u8; N];
    }
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let mut out = [0u8; N];
    for (c, v) in out.iter_mut().enumerate() {
        let p00 = get_channel::<N>(data, width, height, x0, y0, c) as f32;
        let p10 = get_channel::<N>(data, width, height, x0 + 1, y0, c) as f32;
        let p01 = get_channel::<N>(data, width, height, x0, y0 + 1, c) as f32;
        let p11 = get_channel::<N>(data, width, height, x0 + 1, y0 + 1, c) as f32;

        let a = p00 + fx * (p10 - p00);
        let b = p01 + fx * (p11 - p01);
        *v = (a + fy * (b - a)).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Bilinear RGB sample with pixel centres at integer coordinates.
/// Samples outside the frame read as black.
#[inline]
pub fn sample_bilinear_rgb(src: &FrameView<'_>, x: f32, y: f32) -> [u8; 3] {
    sample_bilinear_channels::<RGB_CHANNELS>(src.data, src.width, src.height, x, y)
}

/// Bilinear RGBA sample; outside the layer reads as fully transparent.
#[inline]
pub fn sample_bilinear_rgba(src: &Layer, x: f32, y: f32) -> [u8; 4] {
    sample_bilinear_channels::<RGBA_CHANNELS>(&src.data, src.width, src.height, x, y)
}
