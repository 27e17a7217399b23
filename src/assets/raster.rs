use std::sync::Arc;

use crate::foundation::error::{MockupError, MockupResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Decoded raster image in straight-alpha RGBA8 form.
///
/// Pixel storage is shared behind an `Arc` and never mutated; every engine operation returns a
/// new `Image`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    rgba8: Arc<Vec<u8>>,
}

impl Image {
    /// Wrap row-major straight-alpha RGBA8 bytes, checking `len == width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> MockupResult<Self> {
        let expected = rgba8_len(width, height)?;
        if rgba8.len() != expected {
            return Err(MockupError::validation(format!(
                "rgba8 buffer has {} bytes, expected {expected} for {width}x{height}",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8: Arc::new(rgba8),
        })
    }

    /// Image filled with a single straight-alpha RGBA color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> MockupResult<Self> {
        let n = rgba8_len(width, height)? / 4;
        Self::from_rgba8(width, height, rgba.repeat(n))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw row-major straight-alpha RGBA8 bytes.
    pub fn as_rgba8(&self) -> &[u8] {
        self.rgba8.as_slice()
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = &self.rgba8[idx..idx + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// The alpha channel as a standalone single-channel buffer.
    pub fn alpha_channel(&self) -> Vec<u8> {
        self.rgba8.chunks_exact(4).map(|px| px[3]).collect()
    }

    pub(crate) fn to_premul_vec(&self) -> Vec<u8> {
        let mut out = self.rgba8.as_ref().clone();
        premultiply_rgba8_in_place(&mut out);
        out
    }

    pub(crate) fn from_premul(
        width: u32,
        height: u32,
        mut rgba8_premul: Vec<u8>,
    ) -> MockupResult<Self> {
        unpremultiply_rgba8_in_place(&mut rgba8_premul);
        Self::from_rgba8(width, height, rgba8_premul)
    }

    pub(crate) fn to_rgba_image(&self) -> MockupResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.rgba8.as_ref().clone())
            .ok_or_else(|| MockupError::validation("rgba8 buffer does not match dimensions"))
    }
}

pub(crate) fn rgba8_len(width: u32, height: u32) -> MockupResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| MockupError::validation("image buffer size overflow"))
}
