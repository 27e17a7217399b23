//! Raster stages shared by the full compositor and the overlay fallback.
//!
//! Every buffer here is row-major premultiplied RGBA8.

use image::imageops::FilterType;

use crate::assets::raster::{Image, rgba8_len};
use crate::composition::presentation::{MAX_DESIGN_SCALE, PresentationConfig};
use crate::effects::composite::over;
use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8Premul, Vec2};
use crate::foundation::error::{MockupError, MockupResult};

/// Resampling filter used when scaling the background and the design.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resample {
    /// Nearest neighbor.
    Nearest,
    /// Linear (tent) filter.
    #[default]
    Triangle,
    /// Cubic Catmull-Rom.
    CatmullRom,
    /// Lanczos with a window of 3.
    Lanczos3,
}

impl Resample {
    fn filter(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// A premultiplied raster that is being built up stage by stage.
pub(crate) struct Surface {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) data: Vec<u8>,
}

impl Surface {
    pub(crate) fn filled(canvas: Canvas, straight_rgba: [u8; 4]) -> MockupResult<Self> {
        let len = canvas.rgba8_len()?;
        let px = Rgba8Premul::from_straight_rgba(
            straight_rgba[0],
            straight_rgba[1],
            straight_rgba[2],
            straight_rgba[3],
        )
        .to_array();
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data: px.repeat(len / 4),
        })
    }

    pub(crate) fn transparent(canvas: Canvas) -> MockupResult<Self> {
        Self::filled(canvas, [0, 0, 0, 0])
    }

    pub(crate) fn into_image(self) -> MockupResult<Image> {
        Image::from_premul(self.width, self.height, self.data)
    }

    /// Source-over `src` (a `src_w x src_h` premultiplied buffer) with its top-left at `(x, y)`.
    /// Pixels falling outside the surface are dropped.
    pub(crate) fn blit_over(
        &mut self,
        src: &[u8],
        src_w: u32,
        src_h: u32,
        x: i64,
        y: i64,
        opacity: f32,
    ) {
        let (dw, dh) = (i64::from(self.width), i64::from(self.height));
        for sy in 0..i64::from(src_h) {
            let ty = y + sy;
            if ty < 0 || ty >= dh {
                continue;
            }
            for sx in 0..i64::from(src_w) {
                let tx = x + sx;
                if tx < 0 || tx >= dw {
                    continue;
                }
                let si = ((sy * i64::from(src_w) + sx) as usize) * 4;
                let di = ((ty * dw + tx) as usize) * 4;
                let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
                let d = [
                    self.data[di],
                    self.data[di + 1],
                    self.data[di + 2],
                    self.data[di + 3],
                ];
                self.data[di..di + 4].copy_from_slice(&over(d, s, opacity));
            }
        }
    }
}

/// Fill the canvas with `fill`, then draw `background` fit-within and centered.
///
/// Unless `respect_alpha` is set, the background is treated as fully opaque.
pub(crate) fn draw_background(
    canvas: Canvas,
    fill: [u8; 4],
    background: &Image,
    respect_alpha: bool,
    resample: Resample,
) -> MockupResult<Surface> {
    let mut surface = Surface::filled(canvas, fill)?;
    let (bw, bh) = background.dimensions();
    if bw == 0 || bh == 0 {
        return Ok(surface);
    }

    let premul = if respect_alpha {
        background.to_premul_vec()
    } else {
        let mut opaque = background.as_rgba8().to_vec();
        for px in opaque.chunks_exact_mut(4) {
            px[3] = 255;
        }
        opaque
    };

    let (fit_w, fit_h, x, y) = canvas.fit_within(bw, bh);
    let scaled = resize_premul(premul, bw, bh, fit_w, fit_h, resample)?;
    surface.blit_over(&scaled, fit_w, fit_h, x, y, 1.0);
    tracing::debug!(bw, bh, fit_w, fit_h, x, y, "background placed");
    Ok(surface)
}

/// Size of the design on the canvas: its longer side matches the scale budget of that axis.
///
/// Sizes beyond `MAX_DESIGN_SCALE` times the larger canvas side are rejected before any
/// buffer is allocated.
pub(crate) fn design_size(
    design_w: u32,
    design_h: u32,
    config: &PresentationConfig,
    canvas: Canvas,
) -> MockupResult<(u32, u32)> {
    if design_w == 0 || design_h == 0 {
        return Ok((0, 0));
    }
    let (fw, fh) = (f64::from(design_w), f64::from(design_h));
    let factor = if design_w >= design_h {
        config.scale_x * f64::from(canvas.width) / fw
    } else {
        config.scale_y * f64::from(canvas.height) / fh
    };
    let (w, h) = ((fw * factor).round().max(1.0), (fh * factor).round().max(1.0));

    let limit = (MAX_DESIGN_SCALE * f64::from(canvas.width.max(canvas.height))).ceil();
    if !w.is_finite() || !h.is_finite() || w > limit || h > limit {
        return Err(MockupError::validation(format!(
            "design size {w}x{h} exceeds the {limit}px limit for this canvas"
        )));
    }
    let (w, h) = (w as u32, h as u32);
    rgba8_len(w, h)?;
    Ok((w, h))
}

/// Canvas-space center of the design.
pub(crate) fn design_center(config: &PresentationConfig, canvas: Canvas) -> Point {
    Point::new(
        config.left * f64::from(canvas.width),
        config.top * f64::from(canvas.height),
    )
}

/// Resample a premultiplied buffer to `new_w x new_h`.
pub(crate) fn resize_premul(
    premul: Vec<u8>,
    w: u32,
    h: u32,
    new_w: u32,
    new_h: u32,
    resample: Resample,
) -> MockupResult<Vec<u8>> {
    if (w, h) == (new_w, new_h) {
        return Ok(premul);
    }
    let src = image::RgbaImage::from_raw(w, h, premul)
        .ok_or_else(|| MockupError::validation("resize source does not match dimensions"))?;
    let mut out = image::imageops::resize(&src, new_w, new_h, resample.filter()).into_raw();
    // Ringing filters can push color above alpha, which is not a valid premultiplied pixel.
    for px in out.chunks_exact_mut(4) {
        let a = px[3];
        px[0] = px[0].min(a);
        px[1] = px[1].min(a);
        px[2] = px[2].min(a);
    }
    Ok(out)
}

/// Render a `dw x dh` premultiplied design into a transparent canvas-sized layer, centered on
/// `center` and rotated by `angle_deg` (clockwise on screen) about its own center.
pub(crate) fn place_design_layer(
    design: &[u8],
    dw: u32,
    dh: u32,
    center: Point,
    angle_deg: f64,
    canvas: Canvas,
) -> MockupResult<Surface> {
    let mut layer = Surface::transparent(canvas)?;
    if dw == 0 || dh == 0 {
        return Ok(layer);
    }

    let forward = Affine::translate(center.to_vec2())
        * Affine::rotate(angle_deg.to_radians())
        * Affine::translate(Vec2::new(-f64::from(dw) / 2.0, -f64::from(dh) / 2.0));
    let inverse = forward.inverse();

    let bbox = forward.transform_rect_bbox(Rect::new(0.0, 0.0, f64::from(dw), f64::from(dh)));
    let x0 = bbox.x0.floor().max(0.0) as u32;
    let y0 = bbox.y0.floor().max(0.0) as u32;
    let x1 = bbox.x1.ceil().min(f64::from(canvas.width)).max(0.0) as u32;
    let y1 = bbox.y1.ceil().min(f64::from(canvas.height)).max(0.0) as u32;

    let cw = canvas.width as usize;
    for y in y0..y1 {
        for x in x0..x1 {
            let p = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let px = sample_bilinear(design, dw, dh, p.x - 0.5, p.y - 0.5);
            if px[3] == 0 {
                continue;
            }
            let idx = ((y as usize) * cw + (x as usize)) * 4;
            layer.data[idx..idx + 4].copy_from_slice(&px);
        }
    }
    Ok(layer)
}

fn sample_px(src: &[u8], width: u32, height: u32, x: i64, y: i64) -> [f32; 4] {
    if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
        return [0.0; 4];
    }
    let idx = ((y as usize) * (width as usize) + (x as usize)) * 4;
    [
        f32::from(src[idx]),
        f32::from(src[idx + 1]),
        f32::from(src[idx + 2]),
        f32::from(src[idx + 3]),
    ]
}

fn sample_bilinear(src: &[u8], width: u32, height: u32, u: f64, v: f64) -> [u8; 4] {
    let (fx0, fy0) = (u.floor(), v.floor());
    let (tx, ty) = ((u - fx0) as f32, (v - fy0) as f32);
    let (x0, y0) = (fx0 as i64, fy0 as i64);

    let p00 = sample_px(src, width, height, x0, y0);
    let p10 = sample_px(src, width, height, x0 + 1, y0);
    let p01 = sample_px(src, width, height, x0, y0 + 1);
    let p11 = sample_px(src, width, height, x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] + (p10[c] - p00[c]) * tx;
        let bottom = p01[c] + (p11[c] - p01[c]) * tx;
        out[c] = (top + (bottom - top) * ty).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/stage.rs"]
mod tests;
