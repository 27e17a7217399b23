use crate::foundation::error::{MockupError, MockupResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> MockupResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    /// Reject zero-sized canvases.
    pub fn validate(self) -> MockupResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MockupError::validation(
                "canvas width and height must be > 0",
            ));
        }
        Ok(())
    }

    /// Number of bytes in an RGBA8 buffer covering this canvas.
    pub fn rgba8_len(self) -> MockupResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| MockupError::validation("canvas buffer size overflow"))
    }

    /// Largest `(w, h)` with the aspect ratio of `src_w x src_h` that fits inside the canvas,
    /// together with the top-left offset that centers it.
    pub fn fit_within(self, src_w: u32, src_h: u32) -> (u32, u32, i64, i64) {
        if src_w == 0 || src_h == 0 {
            return (0, 0, 0, 0);
        }
        let scale = f64::min(
            f64::from(self.width) / f64::from(src_w),
            f64::from(self.height) / f64::from(src_h),
        );
        let w = ((f64::from(src_w) * scale).round() as u32).clamp(1, self.width);
        let h = ((f64::from(src_h) * scale).round() as u32).clamp(1, self.height);
        let x = (i64::from(self.width) - i64::from(w)) / 2;
        let y = (i64::from(self.height) - i64::from(h)) / 2;
        (w, h, x, y)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
        }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channels as a `[r, g, b, a]` array.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
